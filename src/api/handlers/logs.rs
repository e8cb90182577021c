//! Handlers for the recent-log buffer.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::logs::{LogMessageRequest, LogsResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the newest 50 buffered log lines, oldest first.
///
/// # Endpoint
///
/// `GET /api/logs`
pub async fn logs_handler(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        logs: state.recent_log.recent(),
        timestamp: Utc::now(),
    })
}

/// Appends an operator note to the buffer.
///
/// # Endpoint
///
/// `POST /api/logs`
pub async fn append_log_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<LogMessageRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state.recent_log.push(format!(
        "{} NOTE user={} {}",
        Utc::now().to_rfc3339(),
        user.user_id,
        payload.message.trim()
    ));

    Ok(StatusCode::CREATED)
}

/// Empties the buffer.
///
/// # Endpoint
///
/// `DELETE /api/logs`
pub async fn clear_logs_handler(State(state): State<AppState>, user: AuthenticatedUser) -> StatusCode {
    state.recent_log.clear();
    tracing::info!(user_id = user.user_id, "Recent log cleared");
    StatusCode::NO_CONTENT
}
