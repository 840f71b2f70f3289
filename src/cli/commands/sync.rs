//! Unattended sync command: preview, auto-approve, execute.

use tokio::runtime::Runtime;

use super::{Direction, build_clients, parse_direction};
use crate::error::Error;
use crate::platform::PlaylistApi;
use crate::sync::approval::auto_approve;
use crate::sync::execute::{ExecuteRequest, PlaylistTarget};
use crate::sync::{ProgressSink, SyncEngine, sync_stats};

#[allow(clippy::too_many_arguments)]
pub fn cmd_sync(
    rt: &Runtime,
    source: &str,
    destination: Option<&str>,
    direction: &str,
    create_new: bool,
    name: Option<&str>,
    spotify_token: Option<&str>,
    ytmusic_url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let direction = parse_direction(direction)?;
    if destination.is_none() && !create_new {
        return Err(Error::invalid_argument(
            "either --destination or --create-new is required",
        )
        .into());
    }
    let config = crate::config::load();
    let engine_config = config.sync.engine_config();
    let (spotify, ytmusic) = build_clients(spotify_token, ytmusic_url);

    rt.block_on(async {
        match direction {
            Direction::YoutubeToSpotify => {
                let engine = SyncEngine::with_config(ytmusic, spotify, engine_config);
                run_sync(&engine, source, destination, create_new, name, json).await
            }
            Direction::SpotifyToYoutube => {
                let engine = SyncEngine::with_config(spotify, ytmusic, engine_config);
                run_sync(&engine, source, destination, create_new, name, json).await
            }
        }
    })
}

async fn run_sync<S: PlaylistApi, D: PlaylistApi>(
    engine: &SyncEngine<S, D>,
    source: &str,
    destination: Option<&str>,
    create_new: bool,
    name: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let preview = engine
        .preview(source, destination, &ProgressSink::disabled())
        .await?;

    let approved = auto_approve(&preview, engine.config().auto_approve_uncertain);
    println!(
        "Approved {} of {} tracks for transfer",
        approved.len(),
        preview.summary.total_source_tracks
    );

    let target = if create_new {
        PlaylistTarget::CreateNew {
            name: name.map(str::to_string),
        }
    } else {
        // Presence checked in cmd_sync.
        PlaylistTarget::Existing(destination.unwrap_or_default().to_string())
    };

    let result = engine
        .execute(ExecuteRequest {
            target,
            approved,
            preview: Some(preview.clone()),
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let stats = sync_stats(&preview, Some(&result));
    println!();
    println!("Playlist: {}", result.playlist_id);
    println!(
        "✓ {} added, ✗ {} failed ({}% of the playlist was auto-syncable)",
        result.summary.successfully_added,
        result.summary.failed,
        stats.preview.syncable_percentage
    );
    for failed in &result.tracks_failed {
        println!(
            "  ✗ \"{}\": {}",
            failed.track.destination_track.title, failed.error
        );
    }

    let nt = &result.non_transferred;
    if result.summary.non_transferred_count > 0 {
        println!();
        println!("Not transferred ({}):", result.summary.non_transferred_count);
        for entry in &nt.unmatched_tracks {
            println!(
                "  unmatched: \"{}\" by {}",
                entry.source_track.title, entry.source_track.artist
            );
        }
        for entry in &nt.unapproved_tracks {
            println!(
                "  unapproved: \"{}\" by {}",
                entry.source_track.title, entry.source_track.artist
            );
        }
        for entry in &nt.failed_tracks {
            println!(
                "  failed: \"{}\" ({})",
                entry.track.source_track.title, entry.error
            );
        }
    }
    Ok(())
}
