//! Handlers for a user's link list.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::user_urls::{PaginationMeta, UserUrlItem, UserUrlsQuery, UserUrlsResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links.
///
/// # Endpoint
///
/// `GET /api/user-urls?search=&sortBy=&startDate=&endDate=&page=&limit=`
///
/// # Query Parameters
///
/// - `search` - case-insensitive match on title, custom title, or original URL
/// - `sortBy` - `newest` (default), `oldest`, or `clicks`
/// - `startDate`, `endDate` - inclusive creation-time bounds
/// - `page` (default 1), `limit` (default 20, max 100)
///
/// # Errors
///
/// Returns 400 with `validation_error` for malformed parameters.
pub async fn user_urls_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<UserUrlsQuery>,
) -> Result<Json<UserUrlsResponse>, AppError> {
    let (page, limit, query) = params.into_alias_query()?;

    let (views, total_count) = state
        .alias_service
        .list_for_user(user.user_id, query)
        .await?;

    Ok(Json(UserUrlsResponse {
        urls: views
            .into_iter()
            .map(|v| UserUrlItem::from_view(v, &state.codec))
            .collect(),
        pagination: PaginationMeta::new(page, limit, total_count),
    }))
}

/// Deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/user-urls/{id}`
///
/// The underlying short URL is removed too once no link references it.
///
/// # Errors
///
/// Returns 403 if the link belongs to another user.
/// Returns 404 if the link does not exist.
pub async fn delete_user_url_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    state.alias_service.delete(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
