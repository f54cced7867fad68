use anyhow::Context;
use tokio::net::TcpListener;

use portfolio_tracker_backend::app::create_app;
use portfolio_tracker_backend::config::{AppConfig, Mode};
use portfolio_tracker_backend::db;
use portfolio_tracker_backend::logging::{init_logging, LoggingConfig};
use portfolio_tracker_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::for_environment()?;

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env(config.mode))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    tracing::info!("Starting in {:?} mode", config.mode);
    if config.mode == Mode::Production && config.secret_key == "dev-secret" {
        tracing::warn!("SECRET_KEY is unset; using the development default");
    }
    let store = db::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to open store")?;

    let app = create_app(AppState::new(store));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Portfolio tracker backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
