//! Application setup and initialization
//!
//! Everything `main` needs to turn a `Config` into a running router.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::services::backend::BackendClient;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidreview_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let state = build_state(config).await?;
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Wire storage and the backend client into shared state, without touching
/// the global tracing subscriber.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    crate::error::configure_error_details(config.expose_error_details());

    let storage = storage::setup_storage(&config).await?;
    let backend = BackendClient::from_config(&config)?;
    tracing::info!(backend_url = %backend.base_url(), "Annotation backend client ready");

    Ok(Arc::new(AppState::new(config, storage, backend)))
}
