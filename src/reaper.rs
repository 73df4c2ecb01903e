use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::engine::Engine;

/// Background task that periodically purges stale reservations, so slots
/// whose reservation never got confirmed don't linger past their time point
/// even when no request traffic triggers the opportunistic sweep.
pub async fn run_reaper(engine: Arc<Engine>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        interval.tick().await;
        let removed = engine.cleanup_old_reservations().await;
        if removed > 0 {
            info!(removed, "reaped stale reservations");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timefmt::parse_timestamp;
    use ulid::Ulid;

    #[tokio::test]
    async fn sweep_collects_past_reserved_slots() {
        let engine = Arc::new(Engine::new());

        // A window well in the past, two slots, both reserved.
        let start = parse_timestamp("2020-01-10 09:00:00").unwrap();
        let end = parse_timestamp("2020-01-10 09:30:00").unwrap();
        engine.add_availability("prov-1", start, end).await.unwrap();

        let slots = engine.get_availability(start, end, None).await;
        assert_eq!(slots.len(), 2);
        for view in &slots {
            let id: Ulid = view.slot_id.parse().unwrap();
            let ts = parse_timestamp(&view.timestamp).unwrap();
            assert!(engine.reserve_slot(id, ts, "client-1").await);
        }

        assert_eq!(engine.cleanup_old_reservations().await, 2);
        // Already swept, nothing left to reap.
        assert_eq!(engine.cleanup_old_reservations().await, 0);
        assert!(engine.get_availability(start, end, None).await.is_empty());
    }
}
