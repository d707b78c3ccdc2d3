//! /messages handler — SMS submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use smsgate_core::{split, submission_id, SplitError, SubmissionRequest};
use smsgate_services::QueueError;

use super::ApiState;

#[derive(Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Correlates log lines for this submission. Not a status handle.
    pub submission_id: String,
    pub segments: usize,
}

// ── /messages (POST) ──────────────────────────────────────────────────────────

/// Validate, split and queue a submission. All segments are queued or none.
///
/// Error texts are static: they are echoed to the client.
pub async fn handle_submit(
    State(state): State<ApiState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), (StatusCode, String)> {
    let Json(req) = payload.map_err(|e| {
        tracing::info!(error = %e, "request body is not valid");
        (StatusCode::BAD_REQUEST, "request body is not valid".to_string())
    })?;

    if let Err(e) = req.validate() {
        tracing::info!(error = %e, "request values are not valid");
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let recipient = req.recipient_msisdn();
    let segments = split(&req.originator, &recipient, &req.message).map_err(|e| match e {
        SplitError::MessageTooLong { units, segments, .. } => {
            tracing::info!(units, segments, "message does not fit into 9 segments");
            (
                StatusCode::BAD_REQUEST,
                "message does not fit into 9 segments".to_string(),
            )
        }
        SplitError::InvalidHeader(e) => {
            tracing::error!(error = %e, "segment header construction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    })?;

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default();
    let id = submission_id(&req, timestamp);
    let count = segments.len();

    state
        .queue
        .enqueue_all(segments, state.enqueue_timeout)
        .await
        .map_err(|e| {
            tracing::warn!(submission_id = %id, error = %e, "submission not queued");
            match e {
                QueueError::Timeout => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "send queue is full, try again later".to_string(),
                ),
                QueueError::BatchTooLarge { .. } | QueueError::Closed => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "send queue unavailable".to_string(),
                ),
                QueueError::ZeroCapacity => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                ),
            }
        })?;

    tracing::info!(submission_id = %id, segments = count, "submission queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            submission_id: id,
            segments: count,
        }),
    ))
}
