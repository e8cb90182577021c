#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use s8l::api;
use s8l::api::handlers::{health_handler, redirect_handler};
use s8l::api::middleware::auth;
use s8l::application::services::auth_service::hash_token;
use s8l::config::Config;
use s8l::infrastructure::recent_log::RecentLog;
use s8l::infrastructure::title::PageTitleFetcher;
use s8l::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const STUB_TITLE: &str = "Stub Page";

/// Title fetcher that never touches the network.
pub struct StubTitleFetcher;

#[async_trait]
impl PageTitleFetcher for StubTitleFetcher {
    async fn fetch_title(&self, _url: &str) -> String {
        STUB_TITLE.to_string()
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        token_signing_secret: TEST_SECRET.to_string(),
        base_url: "https://s8l.xyz".to_string(),
        service_domain: "s8l.xyz".to_string(),
        title_fetch_timeout_ms: 100,
        extra_reserved_prefixes: vec![],
        recent_log_capacity: 100,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(pool),
        &test_config(),
        Arc::new(StubTitleFetcher),
        RecentLog::default(),
    )
}

/// Full route tree without rate limiting (requests carry no peer address).
pub fn make_app(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", Router::new().merge(protected).merge(api::routes::public_routes()))
        .route("/{*path}", get(redirect_handler))
        .with_state(state)
}

pub async fn create_test_user(pool: &PgPool, username: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Creates a user with a token and returns `(user_id, raw_token)`.
pub async fn create_user_with_token(pool: &PgPool, username: &str) -> (i64, String) {
    let user_id = create_test_user(pool, username).await;
    let raw = format!("token-for-{username}");

    sqlx::query("INSERT INTO api_tokens (user_id, name, token_hash) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind("test")
        .bind(hash_token(TEST_SECRET, &raw))
        .execute(pool)
        .await
        .unwrap();

    (user_id, raw)
}

pub async fn create_test_url(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (original_url, short_code, title) VALUES ($1, $2, 'Seeded') RETURNING id",
    )
    .bind(url)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_domain(pool: &PgPool, prefix: &str, user_id: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO custom_domains (prefix, user_id) VALUES ($1, $2) RETURNING id")
        .bind(prefix)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_basic_alias(pool: &PgPool, user_id: i64, url_id: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO user_urls (user_id, url_id) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(url_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_custom_alias(
    pool: &PgPool,
    user_id: i64,
    url_id: i64,
    domain_id: i64,
    path: &str,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO user_urls (user_id, url_id, custom_domain_id, custom_path) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(url_id)
    .bind(domain_id)
    .bind(path)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn click_count(pool: &PgPool, url_id: i64) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM urls WHERE id = $1")
        .bind(url_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn url_exists(pool: &PgPool, url_id: i64) -> bool {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM urls WHERE id = $1)")
        .bind(url_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
