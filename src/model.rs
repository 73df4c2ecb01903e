use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::timefmt::format_timestamp;

/// Width of every bookable slot, in minutes.
pub const SLOT_MINUTES: i64 = 15;

/// How long a reservation may sit unconfirmed before it reverts to available.
pub const RESERVATION_TTL_MINUTES: i64 = 30;

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Reserved,
    Confirmed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "AVAILABLE",
            Status::Reserved => "RESERVED",
            Status::Confirmed => "CONFIRMED",
        }
    }
}

/// One bookable unit: a provider's 15-minute window at a fixed time point.
///
/// `client_id` is `Some` iff `status` is Reserved or Confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub id: Ulid,
    pub provider_id: String,
    /// Start of the window. Immutable; also the record's position in the store.
    pub timestamp: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: Status,
    pub client_id: Option<String>,
    /// Time of the most recent status transition.
    pub last_updated: NaiveDateTime,
}

impl SlotRecord {
    /// Fresh Available record with a new id.
    pub fn available(provider_id: &str, timestamp: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            id: Ulid::new(),
            provider_id: provider_id.to_string(),
            timestamp,
            duration_minutes: SLOT_MINUTES,
            status: Status::Available,
            client_id: None,
            last_updated: now,
        }
    }

    pub fn view(&self) -> SlotView {
        SlotView {
            slot_id: self.id.to_string(),
            provider_id: self.provider_id.clone(),
            timestamp: format_timestamp(self.timestamp),
            duration: self.duration_minutes,
            status: self.status,
            last_updated: format_timestamp(self.last_updated),
            client_id: self.client_id.clone(),
        }
    }
}

// ── Query result types ───────────────────────────────────────

/// Plain-value view of a slot as returned by queries. Timestamps are
/// formatted in the boundary format, duration is minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub slot_id: String,
    pub provider_id: String,
    pub timestamp: String,
    pub duration: i64,
    pub status: Status,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}
