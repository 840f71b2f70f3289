//! Preview reconciliation: match every source track against the
//! destination and bucket the outcome.
//!
//! Per source track the loop runs: duplicate-check → candidate search →
//! classify → bucket. Buckets are disjoint - every source track lands in
//! exactly one of perfect/uncertain/duplicate/no-match, and the summary
//! counts always sum to the source total.
//!
//! Track processing is strictly sequential with a mandatory pacing delay
//! after every iteration (duplicates included) so the destination's search
//! API never sees a burst, regardless of how many lookups short-circuit.

use serde::{Deserialize, Serialize};

use crate::matching::{classify, duplicate, select_best};
use crate::model::{Confidence, MatchCandidate, Track};
use crate::platform::PlaylistApi;
use crate::sync::progress::{percentage, Phase, ProgressEvent, ProgressSink, ProgressStats};
use crate::sync::{SyncEngine, SyncError};

/// A source track paired with its auto-acceptable destination match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfectMatch {
    pub source_track: Track,
    pub matched_track: Track,
    pub confidence: Confidence,
}

/// A source track needing explicit approval, with the suggested candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncertainMatch {
    pub source_track: Track,
    /// Suggested candidates, best first (currently the selector winner).
    pub candidates: Vec<MatchCandidate>,
    pub reason: String,
    pub requires_manual_review: bool,
}

/// A source track already present in the destination playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    pub source_track: Track,
    pub existing_track: Track,
    pub reason: String,
}

/// A source track nothing in the destination could be matched to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoMatchEntry {
    pub source_track: Track,
    pub reason: String,
}

/// Per-bucket counts plus totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub total_source_tracks: usize,
    pub existing_destination_tracks: usize,
    pub perfect_match_count: usize,
    pub uncertain_match_count: usize,
    pub duplicate_count: usize,
    pub no_match_count: usize,
}

/// The reconciliation output: four disjoint buckets over the source set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub perfect_matches: Vec<PerfectMatch>,
    pub uncertain_matches: Vec<UncertainMatch>,
    pub duplicates: Vec<DuplicateEntry>,
    pub no_matches: Vec<NoMatchEntry>,
    pub summary: PreviewSummary,
}

impl PreviewResult {
    /// Bucket partition invariant: counts sum to the source-track total.
    pub fn is_partitioned(&self) -> bool {
        self.perfect_matches.len()
            + self.uncertain_matches.len()
            + self.duplicates.len()
            + self.no_matches.len()
            == self.summary.total_source_tracks
    }
}

impl<S: PlaylistApi, D: PlaylistApi> SyncEngine<S, D> {
    /// Reconcile the source playlist against the destination playlist.
    ///
    /// `destination_playlist` may be `None` when the destination does not
    /// exist yet (the execute step will create it); duplicate detection
    /// then sees an empty collection.
    ///
    /// Only authentication/quota failures abort; a failed candidate search
    /// for one track is logged and treated as zero candidates.
    pub async fn preview(
        &self,
        source_playlist: &str,
        destination_playlist: Option<&str>,
        progress: &ProgressSink,
    ) -> Result<PreviewResult, SyncError> {
        tracing::info!(
            source = source_playlist,
            destination = destination_playlist.unwrap_or("<new>"),
            "previewing sync"
        );

        let (source_tracks, destination_tracks) = match destination_playlist {
            Some(dest) => {
                let (s, d) = tokio::join!(
                    self.source().list_tracks(source_playlist),
                    self.destination().list_tracks(dest)
                );
                (s?, d?)
            }
            None => (self.source().list_tracks(source_playlist).await?, Vec::new()),
        };

        let total = source_tracks.len();
        let mut result = PreviewResult {
            perfect_matches: Vec::new(),
            uncertain_matches: Vec::new(),
            duplicates: Vec::new(),
            no_matches: Vec::new(),
            summary: PreviewSummary {
                total_source_tracks: total,
                existing_destination_tracks: destination_tracks.len(),
                ..Default::default()
            },
        };

        progress
            .emit(ProgressEvent {
                phase: Phase::Analyzing,
                message: format!(
                    "Found {} source tracks and {} destination tracks",
                    total,
                    destination_tracks.len()
                ),
                current: 0,
                total,
                percentage: 0,
                stats: ProgressStats {
                    total,
                    ..Default::default()
                },
            })
            .await;

        for (i, track) in source_tracks.into_iter().enumerate() {
            progress
                .emit(ProgressEvent {
                    phase: Phase::Processing,
                    message: format!("Processing: \"{}\" by \"{}\"", track.title, track.artist),
                    current: i + 1,
                    total,
                    percentage: percentage(i + 1, total),
                    stats: ProgressStats {
                        processed: i + 1,
                        total,
                        matches: result.perfect_matches.len() + result.uncertain_matches.len(),
                        duplicates: result.duplicates.len(),
                    },
                })
                .await;

            self.bucket_track(track, &destination_tracks, &mut result)
                .await?;

            // Mandatory pacing, duplicate short-circuits included: cache
            // hits must not let the loop burst against the search API.
            tokio::time::sleep(self.config().pacing).await;
        }

        result.summary.perfect_match_count = result.perfect_matches.len();
        result.summary.uncertain_match_count = result.uncertain_matches.len();
        result.summary.duplicate_count = result.duplicates.len();
        result.summary.no_match_count = result.no_matches.len();
        debug_assert!(result.is_partitioned());

        progress
            .emit(ProgressEvent {
                phase: Phase::Complete,
                message: format!(
                    "Analysis complete: {} perfect, {} uncertain, {} duplicates, {} unmatched",
                    result.summary.perfect_match_count,
                    result.summary.uncertain_match_count,
                    result.summary.duplicate_count,
                    result.summary.no_match_count
                ),
                current: total,
                total,
                percentage: if total == 0 { 0 } else { 100 },
                stats: ProgressStats {
                    processed: total,
                    total,
                    matches: result.summary.perfect_match_count
                        + result.summary.uncertain_match_count,
                    duplicates: result.summary.duplicate_count,
                },
            })
            .await;

        tracing::info!(
            perfect = result.summary.perfect_match_count,
            uncertain = result.summary.uncertain_match_count,
            duplicates = result.summary.duplicate_count,
            unmatched = result.summary.no_match_count,
            "preview complete"
        );
        Ok(result)
    }

    /// Place one source track into exactly one bucket.
    async fn bucket_track(
        &self,
        track: Track,
        destination_tracks: &[Track],
        result: &mut PreviewResult,
    ) -> Result<(), SyncError> {
        // Duplicate check runs before any search call.
        if let Some(existing) = duplicate::find_existing(&track, destination_tracks) {
            let confidence = classify(&track.title, &track.artist, existing);
            let reason = if confidence >= Confidence::Good {
                "Already in playlist with matching track".to_string()
            } else {
                "Already in playlist (likely same track with slight variation)".to_string()
            };
            result.duplicates.push(DuplicateEntry {
                source_track: track,
                existing_track: existing.clone(),
                reason,
            });
            return Ok(());
        }

        let candidates = match self
            .destination()
            .search_candidates(&track.title, &track.artist)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    title = %track.title,
                    artist = %track.artist,
                    error = %e,
                    "candidate search failed, treating as no matches"
                );
                Vec::new()
            }
        };

        let mut perfect = Vec::new();
        let mut good = Vec::new();
        let mut partial = Vec::new();
        for candidate in candidates {
            match candidate.confidence {
                Confidence::Perfect => perfect.push(candidate),
                Confidence::Good => good.push(candidate),
                Confidence::Partial => partial.push(candidate),
                Confidence::Poor => {}
            }
        }

        if perfect.len() == 1 {
            let matched = perfect.into_iter().next().expect("len checked");
            result.perfect_matches.push(PerfectMatch {
                source_track: track,
                matched_track: matched.track,
                confidence: Confidence::Perfect,
            });
        } else if perfect.len() > 1 {
            // All candidates are already top-tier; multiplicity alone is no
            // reason for manual review. Pick deterministically.
            let best = select_best(&perfect, &track).expect("non-empty");
            result.perfect_matches.push(PerfectMatch {
                source_track: track,
                matched_track: best.track,
                confidence: Confidence::Perfect,
            });
        } else if good.len() == 1 {
            // Deliberately aggressive: a single good match is safe to
            // auto-approve.
            let matched = good.into_iter().next().expect("len checked");
            result.perfect_matches.push(PerfectMatch {
                source_track: track,
                matched_track: matched.track,
                confidence: Confidence::Good,
            });
        } else if good.len() > 1 {
            let best = select_best(&good, &track).expect("non-empty");
            result.uncertain_matches.push(UncertainMatch {
                source_track: track,
                candidates: vec![best],
                reason: "Multiple good matches found - please review".to_string(),
                requires_manual_review: true,
            });
        } else if !partial.is_empty() {
            let best = select_best(&partial, &track).expect("non-empty");
            // The client assigned these tiers; re-examine the winner with
            // our own classifier, which upgrades high-quality partials.
            let reclassified = classify(&track.title, &track.artist, &best.track);
            if reclassified == Confidence::Perfect {
                result.perfect_matches.push(PerfectMatch {
                    source_track: track,
                    matched_track: best.track,
                    confidence: Confidence::Perfect,
                });
            } else {
                result.uncertain_matches.push(UncertainMatch {
                    source_track: track,
                    candidates: vec![best],
                    reason: "Partial match found - please verify".to_string(),
                    requires_manual_review: true,
                });
            }
        } else {
            result.no_matches.push(NoMatchEntry {
                reason: format!(
                    "No suitable matches found on {}",
                    self.destination().platform()
                ),
                source_track: track,
            });
        }

        Ok(())
    }
}
