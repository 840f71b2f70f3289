//! Preview command: match tracks and print the buckets.

use futures::StreamExt;
use tokio::runtime::Runtime;

use super::{Direction, build_clients, parse_direction};
use crate::platform::PlaylistApi;
use crate::sync::{ProgressSink, SyncEngine};

#[allow(clippy::too_many_arguments)]
pub fn cmd_preview(
    rt: &Runtime,
    source: &str,
    destination: Option<&str>,
    direction: &str,
    spotify_token: Option<&str>,
    ytmusic_url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let direction = parse_direction(direction)?;
    let (spotify, ytmusic) = build_clients(spotify_token, ytmusic_url);

    rt.block_on(async {
        match direction {
            Direction::YoutubeToSpotify => {
                let engine = SyncEngine::new(ytmusic, spotify);
                run_preview(&engine, source, destination, json).await
            }
            Direction::SpotifyToYoutube => {
                let engine = SyncEngine::new(spotify, ytmusic);
                run_preview(&engine, source, destination, json).await
            }
        }
    })
}

async fn run_preview<S: PlaylistApi, D: PlaylistApi>(
    engine: &SyncEngine<S, D>,
    source: &str,
    destination: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (sink, stream) = ProgressSink::channel(32);
    let printer = tokio::spawn(async move {
        let mut stream = std::pin::pin!(stream);
        while let Some(event) = stream.next().await {
            eprintln!("[{:3}%] {}", event.percentage, event.message);
        }
    });

    let preview = engine.preview(source, destination, &sink).await?;
    drop(sink);
    let _ = printer.await;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!();
    println!(
        "Preview: {} source tracks against {} destination tracks",
        preview.summary.total_source_tracks, preview.summary.existing_destination_tracks
    );
    println!();

    for entry in &preview.perfect_matches {
        println!(
            "✓ \"{}\" by {} → \"{}\" by {}",
            entry.source_track.title,
            entry.source_track.artist,
            entry.matched_track.title,
            entry.matched_track.artist
        );
    }
    for entry in &preview.uncertain_matches {
        println!(
            "? \"{}\" by {} — {}",
            entry.source_track.title, entry.source_track.artist, entry.reason
        );
        for candidate in &entry.candidates {
            println!(
                "    candidate: \"{}\" by {} ({:?})",
                candidate.track.title, candidate.track.artist, candidate.confidence
            );
        }
    }
    for entry in &preview.duplicates {
        println!(
            "= \"{}\" by {} — {}",
            entry.source_track.title, entry.source_track.artist, entry.reason
        );
    }
    for entry in &preview.no_matches {
        println!(
            "✗ \"{}\" by {} — {}",
            entry.source_track.title, entry.source_track.artist, entry.reason
        );
    }

    println!();
    println!(
        "{} ready to sync, {} need review, {} already present, {} unmatched",
        preview.summary.perfect_match_count,
        preview.summary.uncertain_match_count,
        preview.summary.duplicate_count,
        preview.summary.no_match_count
    );
    Ok(())
}
