//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use serde_json::json;

use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code or custom-domain path to its original URL.
///
/// # Endpoint
///
/// `GET /{*path}`
///
/// The path is either a plain short code (`/aB3_-z`) or a custom-domain path
/// (`/abc.s8l.xyz/promo`). Each successful resolution adds one click to the
/// target URL; a failed click update is logged and never blocks the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if nothing matches the path.
pub async fn redirect_handler(
    Path(path): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    match state.resolver_service.resolve(&path).await? {
        Resolution::Redirect { target, .. } => Ok(Redirect::temporary(&target)),
        Resolution::NotFound => Err(AppError::not_found(
            "Link not found",
            json!({ "path": path }),
        )),
    }
}
