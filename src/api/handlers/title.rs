//! Handler for page title previews.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::title::{TitleQuery, TitleResponse};
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::utils::url_normalizer::normalize_url;

/// Fetches the `<title>` of a page.
///
/// # Endpoint
///
/// `GET /api/title?url=...`
///
/// Fetch failures and timeouts yield the placeholder `"Untitled"`.
///
/// # Errors
///
/// Returns 400 with `invalid_url` if the URL cannot be parsed.
pub async fn title_handler(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Result<Json<TitleResponse>, AppError> {
    let url = normalize_url(&query.url).map_err(|e| {
        AppError::validation(
            ErrorCode::InvalidUrl,
            "Invalid URL format",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let title = state.title_fetcher.fetch_title(&url).await;

    Ok(Json(TitleResponse { title }))
}
