//! Typed progress event stream for long-running reconciliations.
//!
//! The reconciler is the producer; consumers receive an ordered stream of
//! [`ProgressEvent`]s. The stream is one-directional with explicit closed
//! semantics: once the consumer drops its end, further emissions are
//! silently discarded and the reconciliation loop continues unaffected.

use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Which stage of the reconciliation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Analyzing,
    Processing,
    Complete,
}

/// Rolling counters attached to every event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub processed: usize,
    pub total: usize,
    pub matches: usize,
    pub duplicates: usize,
}

/// A single progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub phase: Phase,
    pub message: String,
    pub current: usize,
    pub total: usize,
    pub percentage: u8,
    pub stats: ProgressStats,
}

/// Producer handle for progress events.
///
/// Cheap to clone; a disabled sink drops everything.
#[derive(Clone, Default)]
pub struct ProgressSink {
    tx: Option<mpsc::Sender<ProgressEvent>>,
}

impl ProgressSink {
    /// A sink that discards all events.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// A connected sink plus the stream its events arrive on.
    pub fn channel(capacity: usize) -> (Self, impl Stream<Item = ProgressEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        let stream =
            futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|e| (e, rx)) });
        (Self { tx: Some(tx) }, stream)
    }

    /// Push an event. Returns `false` when the consumer is gone; the
    /// producer keeps running either way.
    pub async fn emit(&self, event: ProgressEvent) -> bool {
        match &self.tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }
}

/// Percentage helper: `current` of `total`, rounded, safe for zero totals.
pub fn percentage(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((current as f64 / total as f64) * 100.0).round() as u8
}
