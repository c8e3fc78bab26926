mod analysis;
mod config;
mod data;
mod errors;
mod features;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::forecast::LinearTrendForecaster;
use crate::analysis::resume::KeywordSkillExtractor;
use crate::config::Config;
use crate::data::store::DataStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerPulse API v{}", env!("CARGO_PKG_VERSION"));

    // Warm the dataset cache; a bad source aborts startup before serving
    let store = Arc::new(DataStore::new(config.data_path.clone()));
    let warm = Arc::clone(&store);
    let dataset = tokio::task::spawn_blocking(move || warm.get())
        .await?
        .with_context(|| format!("Failed to load job data from {}", config.data_path.display()))?;
    info!(
        "Dataset ready: {} records ({} dropped for invalid salary)",
        dataset.len(),
        dataset.stats().dropped_invalid_salary
    );
    if dataset.is_empty() {
        warn!("Job dataset has no valid rows; every query will return empty results");
    }

    // Keyword extractor and linear trend by default; both are trait objects
    let state = AppState {
        store,
        config: config.clone(),
        skill_extractor: Arc::new(KeywordSkillExtractor),
        forecaster: Arc::new(LinearTrendForecaster),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins to the dashboard host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
