use chrono::NaiveDateTime;
use tracing::debug;

use crate::limits::*;
use crate::model::{SlotRecord, SlotView, Status};
use crate::observability::SLOTS_CREATED_TOTAL;

use super::slots::generate_slots;
use super::{now, Engine, EngineError};

impl Engine {
    /// Publish a provider's availability as 15-minute slots over
    /// `[start, end)`. Single-day submission: start and end must fall on the
    /// same calendar date. First write wins per (provider, time point), so
    /// repeated or overlapping submissions never create duplicates and never
    /// touch existing records. Returns the number of records created.
    pub async fn add_availability(
        &self,
        provider_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<usize, EngineError> {
        if provider_id.len() > MAX_ID_LEN {
            return Err(EngineError::LimitExceeded("provider id too long"));
        }
        if start.date() != end.date() {
            return Err(EngineError::InvalidRange { start, end });
        }

        let mut store = self.store.write().await;
        let mut created = 0usize;
        for timestamp in generate_slots(start, end) {
            if store.provider_has_slot(timestamp, provider_id) {
                continue;
            }
            store.insert(SlotRecord::available(provider_id, timestamp, now()));
            created += 1;
        }

        if created > 0 {
            metrics::counter!(SLOTS_CREATED_TOTAL).increment(created as u64);
            debug!(provider_id, created, "availability added");
        }
        Ok(created)
    }

    /// Slots between `start` and `end`. Callers supply same-day boundaries;
    /// multi-day spans are out of contract. With no provider filter every
    /// record in the window is returned whatever its status; with a filter a
    /// slot must belong to that provider AND be Available. Output is
    /// chronological (time point, then slot id).
    pub async fn get_availability(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        provider_id: Option<&str>,
    ) -> Vec<SlotView> {
        let store = self.store.read().await;
        let mut views = Vec::new();
        for timestamp in generate_slots(start, end) {
            let Some(bucket) = store.bucket(timestamp) else {
                continue;
            };
            for record in bucket.values() {
                let include = match provider_id {
                    None => true,
                    Some(p) => record.provider_id == p && record.status == Status::Available,
                };
                if include {
                    views.push(record.view());
                }
            }
        }
        views
    }
}
