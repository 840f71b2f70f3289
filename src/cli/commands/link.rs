//! Bidirectional link sync and service health commands.

use tokio::runtime::Runtime;

use super::build_clients;
use crate::error::ResultExt;
use crate::sync::bidirectional::{LinkSpec, sync_link};
use crate::sync::{ActiveSyncs, SyncEngine};

pub fn cmd_link(
    rt: &Runtime,
    ytmusic_playlist: &str,
    spotify_playlist: &str,
    link_id: Option<&str>,
    spotify_token: Option<&str>,
    ytmusic_url: Option<&str>,
) -> anyhow::Result<()> {
    let config = crate::config::load();
    let engine_config = config.sync.engine_config();
    let (spotify, ytmusic) = build_clients(spotify_token, ytmusic_url);

    let link = LinkSpec {
        id: link_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("{ytmusic_playlist}:{spotify_playlist}")),
        a_playlist: ytmusic_playlist.to_string(),
        b_playlist: spotify_playlist.to_string(),
    };

    let a_to_b = SyncEngine::with_config(ytmusic.clone(), spotify.clone(), engine_config);
    let b_to_a = SyncEngine::with_config(spotify, ytmusic, engine_config);
    let active = ActiveSyncs::new();

    let outcome = rt
        .block_on(sync_link(&a_to_b, &b_to_a, &link, &active))
        .with_context(format!("syncing playlist link {}", link.id))?;

    for direction in [&outcome.a_to_b, &outcome.b_to_a] {
        let mark = if direction.success { "✓" } else { "✗" };
        match &direction.error {
            Some(error) => println!("{mark} {}: {error}", direction.label),
            None => println!(
                "{mark} {}: {} added, {} failed",
                direction.label, direction.tracks_added, direction.tracks_failed
            ),
        }
    }
    println!();
    println!(
        "{}: {} tracks added, {} failed across both directions",
        if outcome.success { "Success" } else { "Partial" },
        outcome.tracks_added,
        outcome.tracks_failed
    );
    Ok(())
}

/// Probe both platforms and report reachability/auth state as data.
pub fn cmd_check_services(
    rt: &Runtime,
    spotify_token: Option<&str>,
    ytmusic_url: Option<&str>,
) -> anyhow::Result<()> {
    let (spotify, ytmusic) = build_clients(spotify_token, ytmusic_url);

    rt.block_on(async {
        println!("Checking platform services...\n");

        match spotify.current_user_id().await {
            Ok(user) => println!("✓ Spotify: authenticated as {user}"),
            Err(e) => println!("✗ Spotify: {e}"),
        }

        match ytmusic.probe().await {
            Ok(()) => println!("✓ YouTube Music: companion service reachable"),
            Err(e) => println!("✗ YouTube Music: {e}"),
        }
    });
    Ok(())
}
