use chrono::{Duration, NaiveDateTime};

use crate::model::SLOT_MINUTES;

/// Every time point `t` with `start <= t < end`, stepping by the slot width,
/// in ascending order. Empty when `start >= end`.
pub fn generate_slots(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let step = Duration::minutes(SLOT_MINUTES);
    let mut slots = Vec::new();
    let mut current = start;
    while current < end {
        slots.push(current);
        current += step;
    }
    slots
}
