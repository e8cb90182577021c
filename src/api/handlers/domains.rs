//! Handlers for custom domain management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::domain::{CreateDomainRequest, DomainItem, DomainListResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's custom domains.
///
/// # Endpoint
///
/// `GET /api/domains`
pub async fn domain_list_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<DomainListResponse>, AppError> {
    let domains = state.domain_service.list_for_user(user.user_id).await?;
    let marker = state.codec.marker();

    Ok(Json(DomainListResponse {
        items: domains
            .into_iter()
            .map(|d| DomainItem::new(d, marker))
            .collect(),
    }))
}

/// Reserves a custom domain prefix.
///
/// # Endpoint
///
/// `POST /api/domains`
///
/// # Errors
///
/// Returns 400 with `prefix_invalid`, `prefix_reserved`, `prefix_taken`,
/// or `domain_limit_exceeded` (a user may hold two domains).
pub async fn create_domain_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateDomainRequest>,
) -> Result<(StatusCode, Json<DomainItem>), AppError> {
    payload.validate()?;

    let domain = state
        .domain_service
        .create(user.user_id, &payload.prefix)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DomainItem::new(domain, state.codec.marker())),
    ))
}

/// Deletes a custom domain with all links under it.
///
/// # Endpoint
///
/// `DELETE /api/domains/{id}`
///
/// # Errors
///
/// Returns 403 if the domain belongs to another user.
/// Returns 404 if domain not found.
pub async fn delete_domain_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    state.domain_service.delete(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
