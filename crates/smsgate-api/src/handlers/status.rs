//! /status handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiState;

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub queue_capacity: usize,
    pub queue_depth: usize,
    pub sent: u64,
    pub failed: u64,
    pub send_interval_ms: u64,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        queue_capacity: state.queue.capacity(),
        queue_depth: state.queue.len(),
        sent: state.stats.sent(),
        failed: state.stats.failed(),
        send_interval_ms: u64::try_from(state.send_interval.as_millis()).unwrap_or(u64::MAX),
    })
}
