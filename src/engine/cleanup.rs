use tracing::debug;

use crate::observability::CLEANUP_REMOVED_TOTAL;

use super::{now, Engine};

impl Engine {
    /// Purge stale reservations: every Reserved record whose time point has
    /// already passed is removed, along with any time/date buckets left
    /// empty. Past Available and Confirmed records stay. Idempotent; safe to
    /// run both before request handling and from the periodic reaper.
    /// Returns the number of records removed.
    pub async fn cleanup_old_reservations(&self) -> usize {
        let removed = self.store.write().await.remove_past_reserved(now());
        if removed > 0 {
            metrics::counter!(CLEANUP_REMOVED_TOTAL).increment(removed as u64);
            debug!(removed, "stale reservations purged");
        }
        removed
    }
}
