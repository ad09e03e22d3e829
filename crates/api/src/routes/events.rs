//! Upload notification endpoint.
//!
//! Accepts an object-store notification document and runs one pipeline
//! invocation per record, in order. The invocations run on their own task,
//! so a client that disconnects early does not cancel them: every started
//! invocation still reaches its email.

use axum::{body::Bytes, extract::State, Json};
use ingest_core::{Error, S3EventNotification};
use tracing::{debug, error, Instrument};

use crate::response::{ApiError, EventsResponse};
use crate::state::AppState;

/// POST /events
pub async fn events_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EventsResponse>, ApiError> {
    let notification = S3EventNotification::parse(&body).map_err(|e| {
        error!("Failed to parse notification: {}", e);
        ApiError::from(e)
    })?;

    debug!(
        records = notification.records.len(),
        payload_size = body.len(),
        "Received notification"
    );

    let pipeline = state.pipeline.clone();
    let task = tokio::spawn(
        async move { pipeline.process_notification(&notification).await }.in_current_span(),
    );

    let outcomes = task.await.map_err(|e| {
        error!("Notification task failed: {}", e);
        Error::internal(format!("notification task failed: {}", e))
    })??;

    Ok(Json(EventsResponse::from_outcomes(&outcomes)))
}
