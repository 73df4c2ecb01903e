use chrono::{Duration, NaiveDateTime};
use ulid::Ulid;

use crate::model::{SlotView, Status, RESERVATION_TTL_MINUTES};
use crate::observability::{
    CONFIRMATIONS_TOTAL, RESERVATIONS_EXPIRED_TOTAL, RESERVATIONS_TOTAL,
};

use super::{now, Engine};

impl Engine {
    /// Reserve a slot for a client: Available → Reserved.
    ///
    /// If the record is currently Reserved but its last transition is older
    /// than the reservation TTL, it first reverts to Available (client
    /// cleared), so a single call may expire a stale reservation and take
    /// the slot over. Returns `false` when the record does not exist at
    /// (date, timestamp, slot id) or is not Available after that check.
    pub async fn reserve_slot(
        &self,
        slot_id: Ulid,
        timestamp: NaiveDateTime,
        client_id: &str,
    ) -> bool {
        let mut store = self.store.write().await;
        let Some(record) = store.get_mut(timestamp, slot_id) else {
            return false;
        };

        if record.status == Status::Reserved
            && record.last_updated < now() - Duration::minutes(RESERVATION_TTL_MINUTES)
        {
            record.status = Status::Available;
            record.client_id = None;
            record.last_updated = now();
            metrics::counter!(RESERVATIONS_EXPIRED_TOTAL).increment(1);
        }

        match record.status {
            Status::Available => {
                record.status = Status::Reserved;
                record.client_id = Some(client_id.to_string());
                record.last_updated = now();
                metrics::counter!(RESERVATIONS_TOTAL).increment(1);
                true
            }
            Status::Reserved | Status::Confirmed => false,
        }
    }

    /// Pure lookup of the record at (date, timestamp, slot id). No mutation;
    /// callers branch on the returned status before confirming.
    pub async fn get_reservation(
        &self,
        slot_id: Ulid,
        timestamp: NaiveDateTime,
    ) -> Option<SlotView> {
        let store = self.store.read().await;
        store.get(timestamp, slot_id).map(|r| r.view())
    }

    /// Confirm a reservation: Reserved → Confirmed when the last transition
    /// is within the reservation TTL. Past the TTL the slot reverts to
    /// Available instead (client cleared) and the call fails. Confirmed is
    /// terminal; confirming anything not currently Reserved fails without
    /// touching the record.
    pub async fn confirm_reservation(&self, timestamp: NaiveDateTime, slot_id: Ulid) -> bool {
        let mut store = self.store.write().await;
        let Some(record) = store.get_mut(timestamp, slot_id) else {
            return false;
        };

        match record.status {
            Status::Reserved => {
                if record.last_updated >= now() - Duration::minutes(RESERVATION_TTL_MINUTES) {
                    record.status = Status::Confirmed;
                    record.last_updated = now();
                    metrics::counter!(CONFIRMATIONS_TOTAL).increment(1);
                    true
                } else {
                    record.status = Status::Available;
                    record.client_id = None;
                    record.last_updated = now();
                    metrics::counter!(RESERVATIONS_EXPIRED_TOTAL).increment(1);
                    false
                }
            }
            Status::Available | Status::Confirmed => false,
        }
    }
}
