//! Handler for the basic shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::MaybeUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or reuses) the short code for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// Authentication is optional. With a valid bearer token the link is also
/// added to the caller's list.
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/a" }
/// ```
///
/// # Response
///
/// `201 Created` for a new short code, `200 OK` when an existing one was reused:
///
/// ```json
/// {
///   "shortCode": "aB3_-z",
///   "originalUrl": "https://example.com/a",
///   "title": "Example",
///   "shortUrl": "https://s8l.xyz/aB3_-z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 with `invalid_url` or `self_referential`.
/// Returns 401 if a token is sent but invalid.
/// Returns 500 with `allocation_exhausted` if no free code could be found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let outcome = state
        .shorten_service
        .shorten_basic(&payload.url, user_id)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse::from_url(outcome.url, &state.codec)),
    ))
}
