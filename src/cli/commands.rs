//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns an `anyhow::Result<()>`.

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

mod link;
mod preview;
mod sync;

use crate::error::Error;
use crate::model::Platform;
use crate::platform::{PlatformSession, SpotifyClient, YtMusicClient};

/// tunesync CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Preview a sync: match tracks and report buckets without writing
    Preview {
        /// Source playlist id
        source: String,
        /// Destination playlist id (omit when the destination is new)
        #[arg(short, long)]
        destination: Option<String>,
        /// Sync direction: ytmusic-to-spotify or spotify-to-ytmusic
        #[arg(long, default_value = "ytmusic-to-spotify")]
        direction: String,
        /// Spotify OAuth bearer token
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: Option<String>,
        /// YouTube Music companion service URL
        #[arg(long, env = "YTMUSIC_SERVICE_URL")]
        ytmusic_url: Option<String>,
        /// Emit the full preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run an unattended sync (preview, auto-approve, execute)
    Sync {
        /// Source playlist id
        source: String,
        /// Destination playlist id
        #[arg(short, long)]
        destination: Option<String>,
        /// Sync direction: ytmusic-to-spotify or spotify-to-ytmusic
        #[arg(long, default_value = "ytmusic-to-spotify")]
        direction: String,
        /// Create a new destination playlist instead of reusing one
        #[arg(long)]
        create_new: bool,
        /// Name for the new playlist (with --create-new)
        #[arg(long)]
        name: Option<String>,
        /// Spotify OAuth bearer token
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: Option<String>,
        /// YouTube Music companion service URL
        #[arg(long, env = "YTMUSIC_SERVICE_URL")]
        ytmusic_url: Option<String>,
        /// Emit the full sync result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sync both directions of a playlist link concurrently
    Link {
        /// YouTube Music playlist id
        #[arg(long)]
        ytmusic_playlist: String,
        /// Spotify playlist id
        #[arg(long)]
        spotify_playlist: String,
        /// Link identity used for concurrent-sync protection
        #[arg(long)]
        link_id: Option<String>,
        /// Spotify OAuth bearer token
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: Option<String>,
        /// YouTube Music companion service URL
        #[arg(long, env = "YTMUSIC_SERVICE_URL")]
        ytmusic_url: Option<String>,
    },
    /// Probe both platforms and report reachability/auth state
    CheckServices {
        /// Spotify OAuth bearer token
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: Option<String>,
        /// YouTube Music companion service URL
        #[arg(long, env = "YTMUSIC_SERVICE_URL")]
        ytmusic_url: Option<String>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Preview {
            source,
            destination,
            direction,
            spotify_token,
            ytmusic_url,
            json,
        } => preview::cmd_preview(
            &rt,
            source,
            destination.as_deref(),
            direction,
            spotify_token.as_deref(),
            ytmusic_url.as_deref(),
            *json,
        ),
        Commands::Sync {
            source,
            destination,
            direction,
            create_new,
            name,
            spotify_token,
            ytmusic_url,
            json,
        } => sync::cmd_sync(
            &rt,
            source,
            destination.as_deref(),
            direction,
            *create_new,
            name.as_deref(),
            spotify_token.as_deref(),
            ytmusic_url.as_deref(),
            *json,
        ),
        Commands::Link {
            ytmusic_playlist,
            spotify_playlist,
            link_id,
            spotify_token,
            ytmusic_url,
        } => link::cmd_link(
            &rt,
            ytmusic_playlist,
            spotify_playlist,
            link_id.as_deref(),
            spotify_token.as_deref(),
            ytmusic_url.as_deref(),
        ),
        Commands::CheckServices {
            spotify_token,
            ytmusic_url,
        } => link::cmd_check_services(&rt, spotify_token.as_deref(), ytmusic_url.as_deref()),
    }
}

/// Which way tracks flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    YoutubeToSpotify,
    SpotifyToYoutube,
}

pub(crate) fn parse_direction(s: &str) -> crate::error::Result<Direction> {
    match s {
        "ytmusic-to-spotify" | "youtube-to-spotify" => Ok(Direction::YoutubeToSpotify),
        "spotify-to-ytmusic" | "spotify-to-youtube" => Ok(Direction::SpotifyToYoutube),
        other => Err(Error::invalid_argument(format!(
            "unknown direction '{other}' (expected ytmusic-to-spotify or spotify-to-ytmusic)"
        ))),
    }
}

/// Construct both platform clients from config + CLI/env overrides.
pub(crate) fn build_clients(
    spotify_token: Option<&str>,
    ytmusic_url: Option<&str>,
) -> (SpotifyClient, YtMusicClient) {
    let config = crate::config::load();
    let spotify_session = match spotify_token
        .map(str::to_string)
        .or_else(|| config.credentials.spotify_token.clone())
    {
        Some(token) => PlatformSession::authenticated(Platform::Spotify, token),
        None => PlatformSession::anonymous(Platform::Spotify),
    };

    let service_url = ytmusic_url
        .map(str::to_string)
        .unwrap_or_else(|| config.credentials.ytmusic_url());
    // The companion service holds the actual cookies; a configured URL is
    // what "authenticated" means on this side.
    let ytmusic_session =
        PlatformSession::authenticated(Platform::YoutubeMusic, service_url.clone());

    (
        SpotifyClient::new(spotify_session),
        YtMusicClient::new(ytmusic_session, service_url),
    )
}
