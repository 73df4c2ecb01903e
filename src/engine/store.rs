use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use ulid::Ulid;

use crate::model::{SlotRecord, Status};

/// All records sharing one time point, keyed by slot id.
pub type SlotBucket = BTreeMap<Ulid, SlotRecord>;

/// Two-level time-indexed slot table: date → time point → slot id → record.
///
/// The outer date index bounds per-query scans to one day's slots and lets
/// the sweeper drop whole days at once. BTreeMaps keep iteration in
/// chronological order, so query output is deterministic without sorting.
pub struct SlotStore {
    days: BTreeMap<NaiveDate, BTreeMap<NaiveDateTime, SlotBucket>>,
}

impl Default for SlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStore {
    pub fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    /// The bucket at a time point, if any record was ever stored there.
    pub fn bucket(&self, timestamp: NaiveDateTime) -> Option<&SlotBucket> {
        self.days
            .get(&timestamp.date())
            .and_then(|day| day.get(&timestamp))
    }

    pub fn get(&self, timestamp: NaiveDateTime, slot_id: Ulid) -> Option<&SlotRecord> {
        self.bucket(timestamp).and_then(|b| b.get(&slot_id))
    }

    pub fn get_mut(&mut self, timestamp: NaiveDateTime, slot_id: Ulid) -> Option<&mut SlotRecord> {
        self.days
            .get_mut(&timestamp.date())
            .and_then(|day| day.get_mut(&timestamp))
            .and_then(|b| b.get_mut(&slot_id))
    }

    /// Whether `provider_id` already owns a record at this time point,
    /// regardless of its status.
    pub fn provider_has_slot(&self, timestamp: NaiveDateTime, provider_id: &str) -> bool {
        self.bucket(timestamp)
            .is_some_and(|b| b.values().any(|r| r.provider_id == provider_id))
    }

    /// Insert a record into the bucket of its own timestamp. The date bucket
    /// is derived from the record, so a record can never land on the wrong day.
    pub fn insert(&mut self, record: SlotRecord) {
        self.days
            .entry(record.timestamp.date())
            .or_default()
            .entry(record.timestamp)
            .or_default()
            .insert(record.id, record);
    }

    /// Remove every Reserved record whose time point is strictly before `now`.
    /// Available and Confirmed records are kept whatever their age. Time and
    /// date buckets left empty are dropped. Returns the number of records
    /// removed.
    pub fn remove_past_reserved(&mut self, now: NaiveDateTime) -> usize {
        let mut removed = 0;
        self.days.retain(|_, day| {
            day.retain(|timestamp, bucket| {
                if *timestamp < now {
                    let before = bucket.len();
                    bucket.retain(|_, record| record.status != Status::Reserved);
                    removed += before - bucket.len();
                }
                !bucket.is_empty()
            });
            !day.is_empty()
        });
        removed
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn slot_count(&self) -> usize {
        self.days
            .values()
            .flat_map(|day| day.values())
            .map(|bucket| bucket.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn insert_lands_in_own_date_bucket() {
        let mut store = SlotStore::new();
        store.insert(SlotRecord::available("p", ts(10, 9, 0), ts(9, 0, 0)));
        store.insert(SlotRecord::available("p", ts(11, 9, 0), ts(9, 0, 0)));
        assert_eq!(store.day_count(), 2);
        assert_eq!(store.slot_count(), 2);
        assert!(store.bucket(ts(10, 9, 0)).is_some());
        assert!(store.bucket(ts(10, 9, 15)).is_none());
    }

    #[test]
    fn get_by_timestamp_and_id() {
        let mut store = SlotStore::new();
        let rec = SlotRecord::available("p", ts(10, 9, 0), ts(9, 0, 0));
        let id = rec.id;
        store.insert(rec);
        assert!(store.get(ts(10, 9, 0), id).is_some());
        assert!(store.get(ts(10, 9, 15), id).is_none());
        assert!(store.get(ts(10, 9, 0), Ulid::new()).is_none());
        store.get_mut(ts(10, 9, 0), id).unwrap().status = Status::Reserved;
        assert_eq!(store.get(ts(10, 9, 0), id).unwrap().status, Status::Reserved);
    }

    #[test]
    fn provider_dup_check_ignores_status() {
        let mut store = SlotStore::new();
        let mut rec = SlotRecord::available("p1", ts(10, 9, 0), ts(9, 0, 0));
        rec.status = Status::Reserved;
        rec.client_id = Some("c".into());
        store.insert(rec);
        assert!(store.provider_has_slot(ts(10, 9, 0), "p1"));
        assert!(!store.provider_has_slot(ts(10, 9, 0), "p2"));
        assert!(!store.provider_has_slot(ts(10, 9, 15), "p1"));
    }

    #[test]
    fn sweep_removes_only_past_reserved() {
        let mut store = SlotStore::new();
        let now = ts(12, 12, 0);

        let mut past_reserved = SlotRecord::available("p", ts(10, 9, 0), now);
        past_reserved.status = Status::Reserved;
        past_reserved.client_id = Some("c".into());
        store.insert(past_reserved);

        let past_available = SlotRecord::available("p", ts(10, 9, 15), now);
        store.insert(past_available);

        let mut past_confirmed = SlotRecord::available("p", ts(11, 9, 0), now);
        past_confirmed.status = Status::Confirmed;
        past_confirmed.client_id = Some("c".into());
        store.insert(past_confirmed);

        let mut future_reserved = SlotRecord::available("p", ts(20, 9, 0), now);
        future_reserved.status = Status::Reserved;
        future_reserved.client_id = Some("c".into());
        store.insert(future_reserved);

        assert_eq!(store.remove_past_reserved(now), 1);
        assert_eq!(store.slot_count(), 3);
        assert!(store.bucket(ts(10, 9, 0)).is_none()); // time bucket pruned
        assert!(store.bucket(ts(10, 9, 15)).is_some());
        assert_eq!(store.remove_past_reserved(now), 0); // idempotent
    }

    #[test]
    fn sweep_drops_empty_date_buckets() {
        let mut store = SlotStore::new();
        let now = ts(12, 12, 0);
        let mut rec = SlotRecord::available("p", ts(10, 9, 0), now);
        rec.status = Status::Reserved;
        rec.client_id = Some("c".into());
        store.insert(rec);

        assert_eq!(store.day_count(), 1);
        assert_eq!(store.remove_past_reserved(now), 1);
        assert_eq!(store.day_count(), 0);
    }

    #[test]
    fn sweep_boundary_is_strict() {
        // A Reserved slot whose time point equals `now` is not yet past.
        let mut store = SlotStore::new();
        let now = ts(10, 9, 0);
        let mut rec = SlotRecord::available("p", now, now);
        rec.status = Status::Reserved;
        rec.client_id = Some("c".into());
        store.insert(rec);
        assert_eq!(store.remove_past_reserved(now), 0);
        assert_eq!(store.slot_count(), 1);
    }
}
