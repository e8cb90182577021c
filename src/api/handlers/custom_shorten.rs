//! Handler for shortening under a custom domain.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::custom_shorten::{CustomShortenRequest, CustomShortenResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a vanity link `{prefix}.{service domain}/{customPath}`.
///
/// # Endpoint
///
/// `POST /api/custom-shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/spring",
///   "customDomainId": 7,
///   "customPath": "promo",
///   "customTitle": "Spring sale"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 with `invalid_url`, `self_referential`, `path_invalid`, or `path_taken`.
/// Returns 403 if the custom domain belongs to another user.
/// Returns 404 if the custom domain does not exist.
pub async fn custom_shorten_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CustomShortenRequest>,
) -> Result<(StatusCode, Json<CustomShortenResponse>), AppError> {
    payload.validate()?;

    let view = state
        .shorten_service
        .shorten_custom(
            user.user_id,
            &payload.url,
            payload.custom_domain_id,
            &payload.custom_path,
            payload.custom_title.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomShortenResponse::from_view(view, &state.codec)),
    ))
}
