//! API route configuration.
//!
//! [`protected_routes`] require Bearer token authentication via
//! [`crate::api::middleware::auth`]; [`public_routes`] accept anonymous callers.

use crate::api::handlers::{
    append_log_handler, clear_logs_handler, create_domain_handler, custom_shorten_handler,
    delete_domain_handler, delete_user_url_handler, domain_list_handler, logs_handler,
    shorten_handler, title_handler, user_urls_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Routes open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /shorten` - Shorten a URL (a token, if sent, must be valid)
/// - `GET  /title`   - Page title preview
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/title", get(title_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /custom-shorten`   - Shorten under one of the caller's domains
/// - `GET    /user-urls`        - Caller's links (filtered, paginated)
/// - `DELETE /user-urls/{id}`   - Delete one of the caller's links
/// - `GET    /domains`          - Caller's custom domains
/// - `POST   /domains`          - Reserve a prefix
/// - `DELETE /domains/{id}`     - Delete a domain and its links
/// - `GET    /logs`             - Recent log lines
/// - `POST   /logs`             - Append an operator note
/// - `DELETE /logs`             - Clear the recent log
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/custom-shorten", post(custom_shorten_handler))
        .route("/user-urls", get(user_urls_handler))
        .route("/user-urls/{id}", delete(delete_user_url_handler))
        .route(
            "/domains",
            get(domain_list_handler).post(create_domain_handler),
        )
        .route("/domains/{id}", delete(delete_domain_handler))
        .route(
            "/logs",
            get(logs_handler)
                .post(append_log_handler)
                .delete(clear_logs_handler),
        )
}
