//! Sync execution: apply approved matches to the destination playlist.
//!
//! Execution re-fetches destination membership first (best-effort defense
//! against drift since preview), validates every approved pair, submits
//! the remainder in fixed-size batches, and reconstructs a non-transferred
//! report by diffing the original preview against the approved set.
//!
//! Re-running with the same approved set is idempotent: tracks already
//! present are silently skipped, so the second run adds nothing and
//! reports no errors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::platform::PlaylistApi;
use crate::sync::approval::{track_key, ApprovedTrack};
use crate::sync::preview::{NoMatchEntry, PreviewResult, UncertainMatch};
use crate::sync::{SyncEngine, SyncError};

/// Where approved tracks land: an existing playlist or a new one.
#[derive(Debug, Clone)]
pub enum PlaylistTarget {
    Existing(String),
    CreateNew { name: Option<String> },
}

/// One execute call's input.
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    pub target: PlaylistTarget,
    pub approved: Vec<ApprovedTrack>,
    /// The preview this approval set was built from; enables the
    /// non-transferred report.
    pub preview: Option<PreviewResult>,
}

/// An approved pair that could not be transferred, with the cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTrack {
    pub track: ApprovedTrack,
    pub error: String,
}

/// Execute-stage accounting of every source track that did not end up in
/// the destination, subdivided by root cause.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonTransferred {
    /// Preview found nothing to match these to.
    pub unmatched_tracks: Vec<NoMatchEntry>,
    /// Uncertain matches the approval step left out.
    pub unapproved_tracks: Vec<UncertainMatch>,
    /// Approved pairs that failed validation or batch submission.
    pub failed_tracks: Vec<FailedTrack>,
}

/// Totals for one execute call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total_approved: usize,
    pub successfully_added: usize,
    pub failed: usize,
    pub non_transferred_count: usize,
}

/// Execution outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub playlist_id: String,
    pub tracks_added: Vec<ApprovedTrack>,
    pub tracks_failed: Vec<FailedTrack>,
    pub non_transferred: NonTransferred,
    pub summary: SyncSummary,
}

impl SyncResult {
    fn empty(playlist_id: String) -> Self {
        Self {
            playlist_id,
            tracks_added: Vec::new(),
            tracks_failed: Vec::new(),
            non_transferred: NonTransferred::default(),
            summary: SyncSummary::default(),
        }
    }
}

/// A destination track passes validation when every field needed for the
/// mutation call is present.
fn validate_pair(pair: &ApprovedTrack) -> Result<(), String> {
    let dest = &pair.destination_track;
    if dest.uri.trim().is_empty() {
        return Err("destination track has no native reference".into());
    }
    if dest.title.trim().is_empty() {
        return Err("destination track has no title".into());
    }
    if dest.credits().iter().all(|a| a.trim().is_empty()) {
        return Err("destination track has no artists".into());
    }
    Ok(())
}

impl<S: PlaylistApi, D: PlaylistApi> SyncEngine<S, D> {
    /// Apply an approved set of matches to the destination.
    ///
    /// Only authentication/quota errors (and playlist creation exhausting
    /// its retries) abort; invalid pairs and failed batches are captured
    /// in the result.
    pub async fn execute(&self, request: ExecuteRequest) -> Result<SyncResult, SyncError> {
        let ExecuteRequest {
            target,
            approved,
            preview,
        } = request;

        if approved.is_empty() {
            tracing::info!("no approved tracks, nothing to execute");
            let playlist_id = match target {
                PlaylistTarget::Existing(id) => id,
                PlaylistTarget::CreateNew { .. } => String::new(),
            };
            return Ok(SyncResult::empty(playlist_id));
        }

        let playlist_id = self.resolve_target(target).await?;

        let mut result = SyncResult::empty(playlist_id.clone());
        result.summary.total_approved = approved.len();

        // Defense against drift since preview: membership is re-read now.
        let existing = self.destination().list_tracks(&playlist_id).await?;
        let existing_uris: HashSet<&str> = existing.iter().map(|t| t.uri.as_str()).collect();
        tracing::debug!(
            playlist = %playlist_id,
            existing = existing.len(),
            approved = approved.len(),
            "executing sync"
        );

        let mut to_add: Vec<ApprovedTrack> = Vec::new();
        for pair in &approved {
            if let Err(reason) = validate_pair(pair) {
                tracing::warn!(error = %reason, "skipping invalid approved pair");
                result.tracks_failed.push(FailedTrack {
                    track: pair.clone(),
                    error: reason.clone(),
                });
                result.non_transferred.failed_tracks.push(FailedTrack {
                    track: pair.clone(),
                    error: reason,
                });
                continue;
            }
            if existing_uris.contains(pair.destination_track.uri.as_str()) {
                // Already present: not an error, not re-added.
                tracing::debug!(title = %pair.destination_track.title, "skipping existing track");
                continue;
            }
            to_add.push(pair.clone());
        }

        // Submit in the destination's documented batch size. A failed batch
        // marks all of its tracks failed; later batches still run.
        for batch in to_add.chunks(self.destination().batch_limit().max(1)) {
            let uris: Vec<String> = batch
                .iter()
                .map(|p| p.destination_track.uri.clone())
                .collect();
            match self.destination().add_tracks(&playlist_id, &uris).await {
                Ok(()) => result.tracks_added.extend_from_slice(batch),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    tracing::error!(error = %e, count = batch.len(), "batch addition failed");
                    for pair in batch {
                        result.tracks_failed.push(FailedTrack {
                            track: pair.clone(),
                            error: e.to_string(),
                        });
                        result.non_transferred.failed_tracks.push(FailedTrack {
                            track: pair.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        // Non-transferred report via set difference against the preview.
        if let Some(preview) = preview {
            let approved_keys: HashSet<String> = approved.iter().map(|p| p.key()).collect();
            result.non_transferred.unmatched_tracks = preview.no_matches;
            result.non_transferred.unapproved_tracks = preview
                .uncertain_matches
                .into_iter()
                .filter(|entry| !approved_keys.contains(&track_key(&entry.source_track)))
                .collect();
        }

        result.summary.successfully_added = result.tracks_added.len();
        result.summary.failed = result.tracks_failed.len();
        result.summary.non_transferred_count = result.non_transferred.unmatched_tracks.len()
            + result.non_transferred.unapproved_tracks.len()
            + result.non_transferred.failed_tracks.len();

        tracing::info!(
            added = result.summary.successfully_added,
            failed = result.summary.failed,
            non_transferred = result.summary.non_transferred_count,
            "sync execution complete"
        );
        Ok(result)
    }

    async fn resolve_target(&self, target: PlaylistTarget) -> Result<String, SyncError> {
        match target {
            PlaylistTarget::Existing(id) if !id.is_empty() => Ok(id),
            PlaylistTarget::Existing(_) => Err(SyncError::NoTargetPlaylist),
            PlaylistTarget::CreateNew { name } => {
                let date = chrono::Utc::now().format("%Y-%m-%d");
                let name = name
                    .unwrap_or_else(|| format!("{} Sync - {}", self.source().platform(), date));
                let description =
                    format!("Synced from {} on {}", self.source().platform(), date);

                let created = self
                    .config()
                    .creation_retry
                    .run(|| self.destination().create_playlist(&name, &description))
                    .await
                    .map_err(SyncError::PlaylistCreation)?;
                Ok(created.id)
            }
        }
    }
}
