use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::reconcile::{PassSummary, StatusBoard};

/// Body of `GET /status`.
#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub ready: bool,
    pub last_pass: Option<PassSummary>,
}

/// Liveness: the process is up.
pub async fn get_healthz() -> &'static str {
    "ok"
}

/// Readiness: at least one pass has finished.
pub async fn get_readyz(State(board): State<Arc<StatusBoard>>) -> (StatusCode, &'static str) {
    if board.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "waiting for first reconciliation pass")
    }
}

/// Version plus the summary of the last pass.
pub async fn get_status(State(board): State<Arc<StatusBoard>>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        ready: board.is_ready(),
        last_pass: board.last(),
    })
}
