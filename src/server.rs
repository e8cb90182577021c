//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring, rate limiter
//! pruning, and the Axum server lifecycle.

use crate::api::middleware::rate_limit::RateLimiters;
use crate::config::Config;
use crate::infrastructure::recent_log::RecentLog;
use crate::infrastructure::title::{HttpTitleFetcher, PageTitleFetcher};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Page title fetcher
/// - Rate limiters and their pruning task
/// - Axum HTTP server
///
/// `recent_log` is the buffer already attached to the tracing subscriber.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config, recent_log: RecentLog) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let title_fetcher: Arc<dyn PageTitleFetcher> = Arc::new(
        HttpTitleFetcher::new(Duration::from_millis(config.title_fetch_timeout_ms))
            .context("Failed to build HTTP client")?,
    );

    let state = AppState::new(Arc::new(pool), &config, title_fetcher, recent_log);

    let limiters = RateLimiters::new(config.behind_proxy);
    let pruner = limiters.spawn_pruner(LIMITER_PRUNE_INTERVAL);

    let app = app_router(state, &limiters);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let result = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    pruner.abort();
    result?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
