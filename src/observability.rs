use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total API requests handled. Labels: op, status.
pub const REQUESTS_TOTAL: &str = "slotd_requests_total";

/// Histogram: request latency in seconds. Labels: op.
pub const REQUEST_DURATION_SECONDS: &str = "slotd_request_duration_seconds";

// ── Slot lifecycle metrics ──────────────────────────────────────

/// Counter: availability records created.
pub const SLOTS_CREATED_TOTAL: &str = "slotd_slots_created_total";

/// Counter: successful reservations.
pub const RESERVATIONS_TOTAL: &str = "slotd_reservations_total";

/// Counter: successful confirmations.
pub const CONFIRMATIONS_TOTAL: &str = "slotd_confirmations_total";

/// Counter: reservations reverted to available after the TTL elapsed.
pub const RESERVATIONS_EXPIRED_TOTAL: &str = "slotd_reservations_expired_total";

/// Counter: stale reserved slots removed by the cleanup sweeper.
pub const CLEANUP_REMOVED_TOTAL: &str = "slotd_cleanup_removed_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
