//! Response construction.
//!
//! # Responsibilities
//! - Relay cached or upstream payloads verbatim as `application/json`
//! - Present upstream failures according to the configured policy
//! - Serialize request-level errors as JSON
//!
//! # Design Decisions
//! - `FailurePolicy::Swallow` keeps the legacy 200 + empty body answer
//! - `FailurePolicy::Surface` maps upstream failures to 502 Bad Gateway

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;

use crate::config::FailurePolicy;
use crate::dispatch::DispatchOutcome;
use crate::upstream::UpstreamError;

/// 200 with a JSON content type and the payload untouched.
pub fn json_payload(payload: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from(payload),
    )
        .into_response()
}

/// An error status with `{"error": message}`.
pub fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Answer for a dispatched request.
pub fn from_outcome(outcome: DispatchOutcome, policy: FailurePolicy) -> Response {
    match outcome {
        DispatchOutcome::Cached(payload) | DispatchOutcome::Fetched(payload) => {
            json_payload(payload)
        }
        DispatchOutcome::UpstreamFailed(e) => upstream_failure(&e, policy),
    }
}

fn upstream_failure(e: &UpstreamError, policy: FailurePolicy) -> Response {
    match policy {
        FailurePolicy::Swallow => json_payload(Bytes::new()),
        FailurePolicy::Surface => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": e.to_string(),
                "status": e.status(),
                "body": e.detail(),
            })),
        )
            .into_response(),
    }
}
