//! Playlist reconciliation engine.
//!
//! # Architecture
//!
//! The engine drives two platform clients through a preview/execute cycle:
//! 1. **Preview** (`preview.rs`) - match every source track against the
//!    destination and bucket the results for approval.
//! 2. **Approval** (`approval.rs`) - resolve externally supplied
//!    selections against the preview into concrete track pairs.
//! 3. **Execute** (`execute.rs`) - apply approved pairs to the destination
//!    playlist with batching, drift re-checks, and a non-transferred
//!    report.
//! 4. **Bidirectional** (`bidirectional.rs`) - run both directions of a
//!    playlist link concurrently and aggregate.
//!
//! Within one direction processing is strictly sequential so the pacing
//! delay actually limits the rate of outbound search calls; the only
//! parallelism lives at the bidirectional level.

pub mod approval;
pub mod bidirectional;
pub mod execute;
pub mod guard;
pub mod preview;
pub mod progress;
pub mod retry;
pub mod stats;

pub use approval::{ApprovalBucket, ApprovalSelection, ApprovedTrack, resolve_approvals};
pub use bidirectional::{BidirectionalOutcome, DirectionOutcome, LinkSpec, sync_link};
pub use execute::{ExecuteRequest, PlaylistTarget, SyncResult};
pub use guard::{ActiveSyncs, SyncPermit};
pub use preview::{PreviewResult, PreviewSummary};
pub use progress::{Phase, ProgressEvent, ProgressSink, ProgressStats};
pub use retry::RetryPolicy;
pub use stats::{SyncStats, sync_stats};

use std::time::Duration;

use crate::platform::{PlatformError, PlaylistApi};

/// Errors that abort an entire preview/execute call.
///
/// Everything recoverable (per-track search failures, invalid pairs,
/// failed batches) is captured as data in the result instead.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Authentication/quota failures from either platform.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Playlist creation failed after exhausting its retry budget.
    #[error("failed to create destination playlist: {0}")]
    PlaylistCreation(PlatformError),

    /// Execute was asked to reuse a playlist but no id was supplied.
    #[error("no target playlist id provided and no new playlist requested")]
    NoTargetPlaylist,

    /// An approval selection referenced a nonexistent preview entry.
    #[error("invalid approval selection: {0}")]
    InvalidApproval(String),

    /// The link already has a sync in flight.
    #[error("sync already in progress for link {0}")]
    SyncInProgress(String),
}

/// Tunables for a sync engine.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Mandatory pause between per-track iterations of a preview. Protects
    /// the destination's search API from bursts; applied after every track,
    /// duplicates included.
    pub pacing: Duration,
    /// Retry budget for playlist creation.
    pub creation_retry: RetryPolicy,
    /// Whether unattended link syncs also approve the suggested candidate
    /// of each uncertain match (in addition to perfect matches).
    pub auto_approve_uncertain: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(100),
            creation_retry: RetryPolicy::default(),
            auto_approve_uncertain: true,
        }
    }
}

/// Reconciliation engine for one sync direction: `source` is read,
/// `destination` is searched and written.
pub struct SyncEngine<S, D> {
    source: S,
    destination: D,
    config: SyncConfig,
}

impl<S: PlaylistApi, D: PlaylistApi> SyncEngine<S, D> {
    pub fn new(source: S, destination: D) -> Self {
        Self::with_config(source, destination, SyncConfig::default())
    }

    pub fn with_config(source: S, destination: D, config: SyncConfig) -> Self {
        Self {
            source,
            destination,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
