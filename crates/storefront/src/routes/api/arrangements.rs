//! Arrangements data endpoint.
//!
//! Forwards a fixed query to the hosted table service and returns its rows
//! unmodified.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::state::AppState;
use crate::supabase::ArrangementsError;

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct ArrangementsResponse {
    pub data: Vec<Value>,
}

/// Error response for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

impl From<ArrangementsError> for ApiError {
    fn from(err: ArrangementsError) -> Self {
        let event_id = sentry::capture_error(&err);
        tracing::error!(
            error = %err,
            sentry_event_id = %event_id,
            "Failed to fetch arrangements"
        );
        Self::new(client_message(&err))
    }
}

/// Error text safe to return to callers.
///
/// Upstream failures pass the service's own message through; transport and
/// parse errors are replaced with a generic message.
fn client_message(err: &ArrangementsError) -> String {
    match err {
        ArrangementsError::Upstream { message, .. } => message.clone(),
        ArrangementsError::NotConfigured => err.to_string(),
        ArrangementsError::Http(_) | ArrangementsError::Parse(_) | ArrangementsError::Url(_) => {
            "Failed to fetch arrangements".to_string()
        }
    }
}

/// List arrangements.
///
/// Returns `{"data": [...]}` on success and a 500 with `{"error": "..."}`
/// on any failure, including when no service is configured.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ArrangementsResponse>, ApiError> {
    let client = state
        .arrangements()
        .ok_or(ArrangementsError::NotConfigured)?;
    let rows = client.list().await?;

    Ok(Json(ArrangementsResponse {
        data: rows.as_ref().clone(),
    }))
}
