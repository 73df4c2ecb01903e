use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Duration;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use ulid::Ulid;

use crate::engine::Engine;
use crate::limits::*;
use crate::model::Status;
use crate::observability::{REQUESTS_TOTAL, REQUEST_DURATION_SECONDS};
use crate::timefmt::{parse_timestamp, DAY_IN_SECONDS};

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route(
            "/availability",
            post(submit_availability).get(get_availability),
        )
        .route("/availability/reserve", post(reserve_slot))
        .route("/availability/confirm/:slot_id", put(confirm_reservation))
        .with_state(engine)
}

/// Record per-op request metrics and build the response in one place.
fn respond(
    op: &'static str,
    started: Instant,
    status: StatusCode,
    body: Value,
) -> (StatusCode, Json<Value>) {
    let outcome = if status.is_success() { "ok" } else { "error" };
    metrics::counter!(REQUESTS_TOTAL, "op" => op, "status" => outcome).increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "op" => op)
        .record(started.elapsed().as_secs_f64());
    (status, Json(body))
}

fn message(text: impl Into<String>) -> Value {
    json!({ "message": text.into() })
}

// ── POST /availability ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAvailabilityRequest {
    provider_id: String,
    start_time: String,
    end_time: String,
}

async fn submit_availability(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<SubmitAvailabilityRequest>,
) -> (StatusCode, Json<Value>) {
    const OP: &str = "submit_availability";
    let started = Instant::now();

    let (Some(start), Some(end)) = (
        parse_timestamp(&req.start_time),
        parse_timestamp(&req.end_time),
    ) else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid timestamp format"),
        );
    };

    match engine.add_availability(&req.provider_id, start, end).await {
        Ok(created) => {
            info!(provider_id = %req.provider_id, created, "availability submitted");
            respond(
                OP,
                started,
                StatusCode::OK,
                message("Availability submitted successfully"),
            )
        }
        Err(e) => {
            warn!(provider_id = %req.provider_id, error = %e, "availability rejected");
            respond(OP, started, StatusCode::BAD_REQUEST, message(e.to_string()))
        }
    }
}

// ── GET /availability ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityParams {
    start_time: String,
    end_time: String,
    provider_id: Option<String>,
}

async fn get_availability(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<AvailabilityParams>,
) -> (StatusCode, Json<Value>) {
    const OP: &str = "get_availability";
    let started = Instant::now();

    engine.cleanup_old_reservations().await;

    let (Some(start), Some(end)) = (
        parse_timestamp(&params.start_time),
        parse_timestamp(&params.end_time),
    ) else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid timestamp format"),
        );
    };

    let slots = engine
        .get_availability(start, end, params.provider_id.as_deref())
        .await;
    respond(
        OP,
        started,
        StatusCode::OK,
        json!({ "availableTimeSlots": slots }),
    )
}

// ── POST /availability/reserve ──────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest {
    slot_id: String,
    timestamp: String,
    client_id: String,
}

async fn reserve_slot(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<ReserveRequest>,
) -> (StatusCode, Json<Value>) {
    const OP: &str = "reserve";
    let started = Instant::now();

    engine.cleanup_old_reservations().await;

    let Some(timestamp) = parse_timestamp(&req.timestamp) else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid timestamp format"),
        );
    };
    let Ok(slot_id) = req.slot_id.parse::<Ulid>() else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid slot id"),
        );
    };
    if req.client_id.len() > MAX_ID_LEN {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Client id too long"),
        );
    }

    // Reservations must be made at least a day ahead. Adapter policy, not a
    // core invariant.
    if timestamp - crate::engine::now() < Duration::seconds(DAY_IN_SECONDS) {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Time slot must be at least 24 hours in the future"),
        );
    }

    if engine.reserve_slot(slot_id, timestamp, &req.client_id).await {
        info!(slot_id = %req.slot_id, client_id = %req.client_id, "slot reserved");
        respond(
            OP,
            started,
            StatusCode::OK,
            message("Time slot reserved successfully"),
        )
    } else {
        respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Time slot not available"),
        )
    }
}

// ── PUT /availability/confirm/{slot_id} ─────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest {
    timestamp: String,
}

async fn confirm_reservation(
    State(engine): State<Arc<Engine>>,
    Path(slot_id): Path<String>,
    Json(req): Json<ConfirmRequest>,
) -> (StatusCode, Json<Value>) {
    const OP: &str = "confirm";
    let started = Instant::now();

    engine.cleanup_old_reservations().await;

    let Some(timestamp) = parse_timestamp(&req.timestamp) else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid timestamp format"),
        );
    };
    let Ok(slot_id) = slot_id.parse::<Ulid>() else {
        return respond(
            OP,
            started,
            StatusCode::BAD_REQUEST,
            message("Invalid slot id"),
        );
    };

    match engine.get_reservation(slot_id, timestamp).await {
        None => respond(
            OP,
            started,
            StatusCode::NOT_FOUND,
            message("Reservation not found"),
        ),
        Some(view) => match view.status {
            Status::Reserved => {
                if engine.confirm_reservation(timestamp, slot_id).await {
                    info!(%slot_id, "reservation confirmed");
                    respond(
                        OP,
                        started,
                        StatusCode::OK,
                        message("Reservation confirmed successfully"),
                    )
                } else {
                    respond(
                        OP,
                        started,
                        StatusCode::BAD_REQUEST,
                        message("Reservation cannot be confirmed"),
                    )
                }
            }
            Status::Confirmed => respond(
                OP,
                started,
                StatusCode::OK,
                message("Reservation already confirmed"),
            ),
            Status::Available => respond(
                OP,
                started,
                StatusCode::BAD_REQUEST,
                message("Reservation cannot be confirmed"),
            ),
        },
    }
}
