//! Application state shared by every handler.

use crate::services::backend::BackendClient;
use std::sync::Arc;
use vidreview_core::{Config, VideoLayout};
use vidreview_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub layout: VideoLayout,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>, backend: BackendClient) -> Self {
        let layout = config.video_layout();
        Self {
            config,
            storage,
            layout,
            backend,
        }
    }
}
