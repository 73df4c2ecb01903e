mod availability;
mod cleanup;
mod error;
mod reservation;
mod slots;
mod store;

pub use error::EngineError;
pub use slots::generate_slots;
pub use store::{SlotBucket, SlotStore};

use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;

/// The slot engine. The store sits behind one coarse lock: every operation
/// is a short read-modify-write, and the expiry-then-reserve sequence inside
/// `reserve_slot` must be atomic.
pub struct Engine {
    pub(crate) store: RwLock<SlotStore>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(SlotStore::new()),
        }
    }
}

/// Wall clock as naive UTC. Read independently at each comparison site.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
