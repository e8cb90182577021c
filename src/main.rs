use s8l::config;
use s8l::infrastructure::recent_log::RecentLog;
use s8l::server;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    let recent_log = RecentLog::new(config.recent_log_capacity);

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = if config.log_format == "json" {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let recent_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(recent_log.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(recent_layer)
        .init();

    config.print_summary();

    server::run(config, recent_log).await
}
