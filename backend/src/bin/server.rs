//! Outbreak Trends HTTP Server Binary
//!
//! Loads the configuration, fetches the source tables once, builds the base
//! dataset and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: upstream CSV URLs, 0.0.0.0:8080
//! cargo run --bin trends-server
//!
//! # Explicit configuration file
//! TRENDS_CONFIG=./trends.toml cargo run --bin trends-server
//! ```
//!
//! # Environment Variables
//!
//! - `TRENDS_CONFIG`: Configuration file (default: `trends.toml` if present)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use outbreak_trends::config::AppConfig;
use outbreak_trends::http::{create_router, AppState};
use outbreak_trends::services::{load_base_dataset, Session};
use outbreak_trends::sources::CsvSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Outbreak Trends HTTP Server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let source: Arc<dyn CsvSource> = Arc::new(config.sources.to_source());

    let dataset = load_base_dataset(source.as_ref(), &config.pipeline)
        .await
        .context("Failed to load the base dataset")?;
    info!(
        "Dataset loaded: {} regions, {} skipped",
        dataset.len(),
        dataset.report.skipped.len()
    );

    let session = Session::new(
        Arc::new(dataset),
        &config.selection.initial,
        config.view.to_view_state(),
    );
    let state = AppState::new(session, source, config.pipeline);
    let app = create_router(state);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
