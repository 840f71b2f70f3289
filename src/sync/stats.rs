//! Percentage roll-ups over preview and execution results.

use serde::{Deserialize, Serialize};

use crate::sync::execute::SyncResult;
use crate::sync::preview::PreviewResult;

/// Preview-stage statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStats {
    pub total_tracks: usize,
    pub ready_to_sync: usize,
    pub needs_review: usize,
    pub not_found: usize,
    pub duplicates: usize,
    /// Share of source tracks that can sync without review, 0-100.
    pub syncable_percentage: u8,
}

/// Execution-stage statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub attempted: usize,
    pub successful: usize,
    pub failed: usize,
    /// Share of attempted additions that landed, 0-100.
    pub success_rate: u8,
}

/// Combined roll-up for reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub preview: PreviewStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionStats>,
}

fn share(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

/// Roll preview (and optionally execution) results up into percentages.
pub fn sync_stats(preview: &PreviewResult, execution: Option<&SyncResult>) -> SyncStats {
    let summary = &preview.summary;
    SyncStats {
        preview: PreviewStats {
            total_tracks: summary.total_source_tracks,
            ready_to_sync: summary.perfect_match_count,
            needs_review: summary.uncertain_match_count,
            not_found: summary.no_match_count,
            duplicates: summary.duplicate_count,
            syncable_percentage: share(summary.perfect_match_count, summary.total_source_tracks),
        },
        execution: execution.map(|result| ExecutionStats {
            attempted: result.summary.total_approved,
            successful: result.summary.successfully_added,
            failed: result.summary.failed,
            success_rate: share(
                result.summary.successfully_added,
                result.summary.total_approved,
            ),
        }),
    }
}
