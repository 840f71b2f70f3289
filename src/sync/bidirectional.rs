//! Bidirectional orchestration over a playlist link.
//!
//! Both directions of a link run concurrently as independent pipelines
//! (preview → auto-approve → execute). Each branch's outcome is captured
//! as its own `Result` - one direction failing never cancels the other -
//! and the aggregate sums their totals while preserving per-direction
//! detail for diagnostics.

use serde::{Deserialize, Serialize};

use crate::platform::PlaylistApi;
use crate::sync::approval::auto_approve;
use crate::sync::execute::{ExecuteRequest, PlaylistTarget};
use crate::sync::guard::ActiveSyncs;
use crate::sync::progress::ProgressSink;
use crate::sync::{SyncEngine, SyncError};

/// A pair of playlists under management, one per platform side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    /// Link identity; concurrent syncs of the same id are rejected.
    pub id: String,
    /// Playlist on the "A" side (source of the A→B direction).
    pub a_playlist: String,
    /// Playlist on the "B" side (source of the B→A direction).
    pub b_playlist: String,
}

/// What one direction of a link sync accomplished.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionOutcome {
    /// Human-readable direction label ("YouTube Music → Spotify").
    pub label: String,
    pub success: bool,
    pub tracks_processed: usize,
    pub tracks_added: usize,
    pub tracks_failed: usize,
    /// Raw error message when the branch failed outright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated outcome of a bidirectional sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidirectionalOutcome {
    pub success: bool,
    pub tracks_processed: usize,
    pub tracks_added: usize,
    pub tracks_failed: usize,
    pub a_to_b: DirectionOutcome,
    pub b_to_a: DirectionOutcome,
    /// Collected branch error messages, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Run one direction unattended: preview, auto-approve, execute.
///
/// Approves every perfect match; when the engine's config says so, also
/// the suggested candidate of each uncertain match.
pub async fn run_direction<S, D>(
    engine: &SyncEngine<S, D>,
    source_playlist: &str,
    destination_playlist: &str,
    progress: &ProgressSink,
) -> Result<DirectionOutcome, SyncError>
where
    S: PlaylistApi,
    D: PlaylistApi,
{
    let label = format!(
        "{} → {}",
        engine.source().platform(),
        engine.destination().platform()
    );
    tracing::info!(direction = %label, "starting directional sync");

    let preview = engine
        .preview(source_playlist, Some(destination_playlist), progress)
        .await?;

    let approved = auto_approve(&preview, engine.config().auto_approve_uncertain);
    if approved.is_empty() {
        tracing::info!(direction = %label, "no tracks available for unattended sync");
        return Ok(DirectionOutcome {
            label,
            success: true,
            tracks_processed: 0,
            tracks_added: 0,
            tracks_failed: 0,
            error: None,
        });
    }

    let result = engine
        .execute(ExecuteRequest {
            target: PlaylistTarget::Existing(destination_playlist.to_string()),
            approved,
            preview: Some(preview),
        })
        .await?;

    Ok(DirectionOutcome {
        label,
        success: result.summary.successfully_added > 0 || result.summary.failed == 0,
        tracks_processed: result.summary.total_approved,
        tracks_added: result.summary.successfully_added,
        tracks_failed: result.summary.failed,
        error: None,
    })
}

/// Sync both directions of a link concurrently and aggregate.
///
/// Overall success: both directions succeeded, OR at least one direction
/// added tracks while neither branch failed outright.
pub async fn sync_link<A, B>(
    a_to_b: &SyncEngine<A, B>,
    b_to_a: &SyncEngine<B, A>,
    link: &LinkSpec,
    active: &ActiveSyncs,
) -> Result<BidirectionalOutcome, SyncError>
where
    A: PlaylistApi,
    B: PlaylistApi,
{
    // Claimed for the whole run; released on every exit path.
    let _permit = active.begin(&link.id)?;
    tracing::info!(link = %link.id, "starting bidirectional sync");

    let sink = ProgressSink::disabled();
    let (forward, reverse) = tokio::join!(
        run_direction(a_to_b, &link.a_playlist, &link.b_playlist, &sink),
        run_direction(b_to_a, &link.b_playlist, &link.a_playlist, &sink),
    );

    let forward_label = format!(
        "{} → {}",
        a_to_b.source().platform(),
        a_to_b.destination().platform()
    );
    let reverse_label = format!(
        "{} → {}",
        b_to_a.source().platform(),
        b_to_a.destination().platform()
    );

    let a_to_b_outcome = settle(forward, forward_label);
    let b_to_a_outcome = settle(reverse, reverse_label);

    let mut errors = Vec::new();
    for outcome in [&a_to_b_outcome, &b_to_a_outcome] {
        if let Some(ref error) = outcome.error {
            errors.push(format!("{}: {}", outcome.label, error));
        }
    }

    let tracks_processed = a_to_b_outcome.tracks_processed + b_to_a_outcome.tracks_processed;
    let tracks_added = a_to_b_outcome.tracks_added + b_to_a_outcome.tracks_added;
    let tracks_failed = a_to_b_outcome.tracks_failed + b_to_a_outcome.tracks_failed;

    let both_succeeded = a_to_b_outcome.success && b_to_a_outcome.success;
    let no_branch_errors = errors.is_empty();
    let success = both_succeeded || (tracks_added > 0 && no_branch_errors);

    tracing::info!(
        link = %link.id,
        added = tracks_added,
        failed = tracks_failed,
        success,
        "bidirectional sync complete"
    );

    Ok(BidirectionalOutcome {
        success,
        tracks_processed,
        tracks_added,
        tracks_failed,
        a_to_b: a_to_b_outcome,
        b_to_a: b_to_a_outcome,
        errors,
    })
}

/// Collapse a branch result into an outcome, capturing the error instead
/// of propagating it.
fn settle(result: Result<DirectionOutcome, SyncError>, label: String) -> DirectionOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(direction = %label, error = %e, "directional sync failed");
            DirectionOutcome {
                label,
                success: false,
                tracks_processed: 0,
                tracks_added: 0,
                tracks_failed: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::model::{Confidence, Platform};
    use crate::platform::traits::mocks::MockPlatform;
    use crate::platform::PlatformError;
    use crate::sync::{RetryPolicy, SyncConfig};
    use crate::test_utils::{candidate, source_track};

    fn fast_config() -> SyncConfig {
        SyncConfig {
            pacing: Duration::from_millis(1),
            creation_retry: RetryPolicy::new(3, Duration::from_millis(1)),
            auto_approve_uncertain: true,
        }
    }

    fn link() -> LinkSpec {
        LinkSpec {
            id: "link-1".into(),
            a_playlist: "yt-list".into(),
            b_playlist: "sp-list".into(),
        }
    }

    fn engines(
        a: MockPlatform,
        b: MockPlatform,
    ) -> (
        SyncEngine<Arc<MockPlatform>, Arc<MockPlatform>>,
        SyncEngine<Arc<MockPlatform>, Arc<MockPlatform>>,
        Arc<MockPlatform>,
        Arc<MockPlatform>,
    ) {
        let a = Arc::new(a);
        let b = Arc::new(b);
        (
            SyncEngine::with_config(Arc::clone(&a), Arc::clone(&b), fast_config()),
            SyncEngine::with_config(Arc::clone(&b), Arc::clone(&a), fast_config()),
            a,
            b,
        )
    }

    /// One track on each side, each findable on the other platform.
    fn happy_mocks() -> (MockPlatform, MockPlatform) {
        let a = MockPlatform::new(Platform::YoutubeMusic)
            .with_playlist("yt-list", vec![source_track("Innuendo", "Queen")])
            .with_search("Headlong", {
                let mut c = candidate("Headlong", "Queen", Confidence::Perfect);
                c.track.platform = Platform::YoutubeMusic;
                vec![c]
            });
        let b = MockPlatform::new(Platform::Spotify)
            .with_playlist(
                "sp-list",
                vec![crate::test_utils::dest_track("Headlong", "Queen")],
            )
            .with_search(
                "Innuendo",
                vec![candidate("Innuendo", "Queen", Confidence::Perfect)],
            );
        (a, b)
    }

    #[tokio::test]
    async fn test_both_directions_add_tracks() {
        let (a, b) = happy_mocks();
        let (a_to_b, b_to_a, yt, sp) = engines(a, b);
        let active = ActiveSyncs::new();

        let outcome = sync_link(&a_to_b, &b_to_a, &link(), &active).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.tracks_added, 2);
        assert!(outcome.errors.is_empty());
        // Each destination gained its missing track.
        assert_eq!(sp.playlist_tracks("sp-list").len(), 2);
        assert_eq!(yt.playlist_tracks("yt-list").len(), 2);
        // The permit was released.
        assert!(!active.is_active("link-1"));
    }

    #[tokio::test]
    async fn test_one_direction_failure_is_isolated() {
        // B side: searching fails fatally, so A→B dies while B→A works.
        let a = MockPlatform::new(Platform::YoutubeMusic)
            .with_playlist("yt-list", vec![source_track("Innuendo", "Queen")])
            .with_search("Headlong", {
                let mut c = candidate("Headlong", "Queen", Confidence::Perfect);
                c.track.platform = Platform::YoutubeMusic;
                vec![c]
            });
        let b = MockPlatform::new(Platform::Spotify)
            .with_playlist(
                "sp-list",
                vec![crate::test_utils::dest_track("Headlong", "Queen")],
            )
            .with_search_error(PlatformError::QuotaExceeded(Platform::Spotify));
        let (a_to_b, b_to_a, yt, _sp) = engines(a, b);
        let active = ActiveSyncs::new();

        let outcome = sync_link(&a_to_b, &b_to_a, &link(), &active).await.unwrap();

        assert!(outcome.a_to_b.error.is_some());
        assert!(outcome.b_to_a.error.is_none());
        assert_eq!(outcome.errors.len(), 1);
        // The healthy direction still delivered its track.
        assert_eq!(outcome.tracks_added, 1);
        assert_eq!(yt.playlist_tracks("yt-list").len(), 2);
        // One branch errored, so aggregate success requires both.
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_concurrent_link_sync_rejected() {
        let (a, b) = happy_mocks();
        let (a_to_b, b_to_a, _yt, _sp) = engines(a, b);
        let active = ActiveSyncs::new();
        let _held = active.begin("link-1").unwrap();

        let result = sync_link(&a_to_b, &b_to_a, &link(), &active).await;
        assert!(matches!(result, Err(SyncError::SyncInProgress(_))));
    }

    #[tokio::test]
    async fn test_empty_link_sync_succeeds_vacuously() {
        let a = MockPlatform::new(Platform::YoutubeMusic).with_playlist("yt-list", vec![]);
        let b = MockPlatform::new(Platform::Spotify).with_playlist("sp-list", vec![]);
        let (a_to_b, b_to_a, _yt, _sp) = engines(a, b);
        let active = ActiveSyncs::new();

        let outcome = sync_link(&a_to_b, &b_to_a, &link(), &active).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.tracks_added, 0);
    }

    #[tokio::test]
    async fn test_run_direction_skips_duplicates() {
        // Everything in A already exists in B: nothing to approve.
        let a = MockPlatform::new(Platform::YoutubeMusic)
            .with_playlist("yt-list", vec![source_track("Headlong", "Queen")]);
        let b = MockPlatform::new(Platform::Spotify).with_playlist(
            "sp-list",
            vec![crate::test_utils::dest_track("Headlong", "Queen")],
        );
        let (a_to_b, _b_to_a, _yt, sp) = engines(a, b);

        let outcome = run_direction(&a_to_b, "yt-list", "sp-list", &ProgressSink::disabled())
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.tracks_added, 0);
        assert_eq!(sp.playlist_tracks("sp-list").len(), 1);
    }
}
