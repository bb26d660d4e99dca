//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vidreview_core::Config;
use vidreview_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    let layout = config.video_layout();
    tracing::info!(
        backend = %storage.backend_type(),
        review_prefix = %layout.review_prefix(),
        reference_prefix = %layout.reference_prefix(),
        "Storage backend initialized"
    );

    Ok(storage)
}
