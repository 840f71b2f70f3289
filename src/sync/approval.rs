//! Approval input: turning external selections into concrete track pairs.
//!
//! The approval step is an external collaborator (a human in a UI, or the
//! unattended link sync). Its selections reference entries of the most
//! recent [`PreviewResult`] by bucket and index; resolution turns them
//! into explicit {source, destination} pairs the executor consumes.

use serde::{Deserialize, Serialize};

use crate::matching::canonical;
use crate::model::Track;
use crate::sync::preview::PreviewResult;
use crate::sync::SyncError;

/// An explicit source/destination pairing approved for transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedTrack {
    pub source_track: Track,
    pub destination_track: Track,
}

impl ApprovedTrack {
    /// Normalized identity key for set-difference bookkeeping.
    pub fn key(&self) -> String {
        track_key(&self.source_track)
    }
}

/// Normalized "title-artist" key of a source track.
pub fn track_key(track: &Track) -> String {
    format!("{}-{}", canonical(&track.title), canonical(&track.artist))
}

/// Which preview bucket a selection points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalBucket {
    Perfect,
    Uncertain,
}

/// A reference to one bucket entry, plus the chosen candidate for
/// uncertain entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSelection {
    pub bucket: ApprovalBucket,
    pub index: usize,
    /// Index into the uncertain entry's candidate list; ignored for
    /// perfect entries.
    #[serde(default)]
    pub candidate: usize,
}

/// Resolve selections against a preview into approved pairs.
///
/// Fails on out-of-range references rather than silently skipping them:
/// an invalid selection means the caller is working from a stale preview.
pub fn resolve_approvals(
    preview: &PreviewResult,
    selections: &[ApprovalSelection],
) -> Result<Vec<ApprovedTrack>, SyncError> {
    let mut approved = Vec::with_capacity(selections.len());

    for selection in selections {
        match selection.bucket {
            ApprovalBucket::Perfect => {
                let entry = preview.perfect_matches.get(selection.index).ok_or_else(|| {
                    SyncError::InvalidApproval(format!(
                        "perfect match index {} out of range",
                        selection.index
                    ))
                })?;
                approved.push(ApprovedTrack {
                    source_track: entry.source_track.clone(),
                    destination_track: entry.matched_track.clone(),
                });
            }
            ApprovalBucket::Uncertain => {
                let entry = preview
                    .uncertain_matches
                    .get(selection.index)
                    .ok_or_else(|| {
                        SyncError::InvalidApproval(format!(
                            "uncertain match index {} out of range",
                            selection.index
                        ))
                    })?;
                let candidate = entry.candidates.get(selection.candidate).ok_or_else(|| {
                    SyncError::InvalidApproval(format!(
                        "candidate index {} out of range for uncertain match {}",
                        selection.candidate, selection.index
                    ))
                })?;
                approved.push(ApprovedTrack {
                    source_track: entry.source_track.clone(),
                    destination_track: candidate.track.clone(),
                });
            }
        }
    }

    Ok(approved)
}

/// Approve every perfect match, plus (optionally) the suggested candidate
/// of every uncertain match. This is the unattended link-sync policy.
pub fn auto_approve(preview: &PreviewResult, include_uncertain: bool) -> Vec<ApprovedTrack> {
    let mut approved: Vec<ApprovedTrack> = preview
        .perfect_matches
        .iter()
        .map(|entry| ApprovedTrack {
            source_track: entry.source_track.clone(),
            destination_track: entry.matched_track.clone(),
        })
        .collect();

    if include_uncertain {
        for entry in &preview.uncertain_matches {
            if let Some(best) = entry.candidates.first() {
                approved.push(ApprovedTrack {
                    source_track: entry.source_track.clone(),
                    destination_track: best.track.clone(),
                });
            }
        }
    }

    approved
}
