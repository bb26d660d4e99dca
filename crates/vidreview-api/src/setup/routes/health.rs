//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub storage_backend: String,
}

/// Storage reachability. The annotation backend is not checked; its outages
/// surface on the proxy routes.
///
/// The failure cause goes to the log only.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = match tokio::time::timeout(CHECK_TIMEOUT, state.storage.health_check()).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Storage health check failed");
            "unhealthy".to_string()
        }
        Err(_) => {
            tracing::warn!("Storage health check timed out");
            "timeout".to_string()
        }
    };

    let healthy = storage == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthCheckResponse {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            storage,
            storage_backend: state.storage.backend_type().to_string(),
        }),
    )
}
