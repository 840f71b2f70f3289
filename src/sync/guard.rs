//! Concurrent-sync protection for playlist links.
//!
//! A link (a pair of playlists under management) must not have two syncs
//! executing at once. [`ActiveSyncs`] is an in-memory set keyed by link
//! identity; [`ActiveSyncs::begin`] either hands out an RAII permit or
//! rejects outright - concurrent requests are never queued.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::sync::SyncError;

/// Registry of links with a sync currently in flight.
#[derive(Clone, Default)]
pub struct ActiveSyncs {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl ActiveSyncs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the link for a sync run. The returned permit releases the
    /// claim when dropped, including on early return and panic unwind.
    pub fn begin(&self, link_id: &str) -> Result<SyncPermit, SyncError> {
        let mut active = self.inner.lock();
        if !active.insert(link_id.to_string()) {
            return Err(SyncError::SyncInProgress(link_id.to_string()));
        }
        Ok(SyncPermit {
            link_id: link_id.to_string(),
            registry: Arc::clone(&self.inner),
        })
    }

    pub fn is_active(&self, link_id: &str) -> bool {
        self.inner.lock().contains(link_id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().len()
    }
}

/// RAII claim on a link.
pub struct SyncPermit {
    link_id: String,
    registry: Arc<Mutex<HashSet<String>>>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.link_id);
    }
}
