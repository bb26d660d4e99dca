//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p vidreview-api`.

#![allow(dead_code)]

pub mod storage;

use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use vidreview_api::services::backend::BackendClient;
use vidreview_api::setup::routes;
use vidreview_api::state::AppState;
use vidreview_core::Config;
use vidreview_storage::{LocalStorage, Storage};

/// Unroutable backend for tests that never reach it.
pub const NO_BACKEND: &str = "http://127.0.0.1:9";

pub fn test_config(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_source(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Router over an arbitrary storage, with the backend pointed at `backend_url`.
pub fn server_with(
    storage: Arc<dyn Storage>,
    backend_url: &str,
    extra: &[(&str, &str)],
) -> TestServer {
    let mut pairs = vec![("BACKEND_API_URL", backend_url)];
    pairs.extend_from_slice(extra);
    let config = test_config(&pairs);

    let backend = BackendClient::from_config(&config).expect("backend client");
    let state = Arc::new(AppState::new(config.clone(), storage, backend));
    let router = routes::setup_routes(&config, state).expect("router");
    TestServer::new(router).expect("test server")
}

/// Test application over a temporary local storage root.
pub struct TestApp {
    pub server: TestServer,
    pub root: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Write `data` at `key` (relative to the storage root).
    pub fn write(&self, key: &str, data: &[u8]) {
        let path = self.root.path().join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, data).expect("write fixture");
    }
}

pub async fn setup_local_app(extra: &[(&str, &str)]) -> TestApp {
    setup_local_app_with_backend(NO_BACKEND, extra).await
}

pub async fn setup_local_app_with_backend(backend_url: &str, extra: &[(&str, &str)]) -> TestApp {
    let root = TempDir::new().expect("temp dir");
    let storage = LocalStorage::new(root.path())
        .await
        .expect("local storage");
    let server = server_with(Arc::new(storage), backend_url, extra);
    TestApp { server, root }
}

/// Deterministic clip content: byte `i` is `i % 251`.
pub fn clip(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
