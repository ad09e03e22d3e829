//! API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ingest_core::Error;
use pipeline::{DeviceStatus, InvocationOutcome};
use serde::{Deserialize, Serialize};
use telemetry::{ComponentHealthReport, HealthStatus};

/// Per-record result.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResult {
    pub key: String,
    pub device_status: Option<DeviceStatus>,
    pub row_count: Option<usize>,
    pub artifact_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<&InvocationOutcome> for EventResult {
    fn from(outcome: &InvocationOutcome) -> Self {
        Self {
            key: outcome.key.clone(),
            device_status: outcome.device_status,
            row_count: outcome.row_count,
            artifact_key: outcome.artifact_key.clone(),
            warning: outcome.warning.clone(),
        }
    }
}

/// Response for a processed notification.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub success: bool,
    pub processed: usize,
    pub timestamp: i64,
    pub results: Vec<EventResult>,
}

impl EventsResponse {
    pub fn from_outcomes(outcomes: &[InvocationOutcome]) -> Self {
        Self {
            success: true,
            processed: outcomes.len(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            results: outcomes.iter().map(EventResult::from).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub storage_connected: bool,
    pub mailer_connected: bool,
    pub catalog_connected: bool,
    pub in_flight_invocations: u64,
    pub components: Vec<ComponentHealthReport>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error carrying a status and a stable error code.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Serialization(_) => StatusCode::BAD_REQUEST,
            Error::Send(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::with_code(status, err.code(), err.to_string())
    }
}
