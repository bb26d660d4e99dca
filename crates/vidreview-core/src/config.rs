//! Configuration module
//!
//! All settings are read once at startup and passed into constructors; nothing
//! below this module reads the environment.

use std::env;

use crate::models::VideoLayout;
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./videos";
const DEFAULT_REVIEW_PREFIX: &str = "ReviewVideos";
const DEFAULT_REFERENCE_PREFIX: &str = "ReferenceVideos";
const DEFAULT_DEV_API_URL: &str = "http://localhost:5000";
const BACKEND_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 512;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    environment: String,
    cors_origins: Vec<String>,
    log_json: bool,
    expose_error_details: bool,
    http_concurrency_limit: usize,
    // Storage configuration
    storage_backend: StorageBackend,
    local_storage_path: String,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    gcs_bucket: Option<String>,
    // Video layout
    review_prefix: String,
    reference_prefix: String,
    review_batches: Option<Vec<String>>,
    // Annotation backend
    backend_api_url: String,
    backend_timeout_secs: u64,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = is_production_env(&environment);

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let server_port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Local,
        };

        let backend_api_url = match var("BACKEND_API_URL") {
            Some(url) => url,
            None if is_production => var("PROD_API_URL").ok_or_else(|| {
                anyhow::anyhow!("PROD_API_URL or BACKEND_API_URL must be set in production")
            })?,
            None => var("DEV_API_URL").unwrap_or_else(|| DEFAULT_DEV_API_URL.to_string()),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins: split_list(&cors_origins_str),
            log_json: var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            expose_error_details: !is_production
                && var("EXPOSE_ERROR_DETAILS")
                    .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                    .unwrap_or(false),
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            gcs_bucket: var("GCS_BUCKET"),
            review_prefix: var("REVIEW_PREFIX")
                .unwrap_or_else(|| DEFAULT_REVIEW_PREFIX.to_string()),
            reference_prefix: var("REFERENCE_PREFIX")
                .unwrap_or_else(|| DEFAULT_REFERENCE_PREFIX.to_string()),
            review_batches: var("REVIEW_BATCHES")
                .map(|s| split_list(&s))
                .filter(|batches| !batches.is_empty()),
            backend_api_url: backend_api_url.trim_end_matches('/').to_string(),
            backend_timeout_secs: var("BACKEND_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(BACKEND_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.s3_endpoint.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Gcs => {
                if self.gcs_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "GCS_BUCKET must be set when using GCS storage backend"
                    ));
                }
            }
            StorageBackend::Local | StorageBackend::Memory => {}
        }

        if !self.backend_api_url.starts_with("http://")
            && !self.backend_api_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "Backend API URL must start with http:// or https://, got {}",
                self.backend_api_url
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }

    /// Whether error bodies may carry `details`. Always false in production.
    pub fn expose_error_details(&self) -> bool {
        self.expose_error_details
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.local_storage_path
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn gcs_bucket(&self) -> Option<&str> {
        self.gcs_bucket.as_deref()
    }

    pub fn video_layout(&self) -> VideoLayout {
        VideoLayout::new(&self.review_prefix, &self.reference_prefix)
    }

    /// Batches exposed by the index; `None` means all of them.
    pub fn review_batches(&self) -> Option<&[String]> {
        self.review_batches.as_deref()
    }

    pub fn backend_api_url(&self) -> &str {
        &self.backend_api_url
    }

    pub fn backend_timeout_secs(&self) -> u64 {
        self.backend_timeout_secs
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
