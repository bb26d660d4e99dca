//! HTTP client for the annotation backend.
//!
//! Thin pass-through: each call forwards a JSON body, and maps transport
//! failures and non-success statuses onto `AppError` with the message the
//! corresponding route exposes to clients.

use crate::constants::{ADD_ANNOTATION_FAILED, CHECK_USER_FAILED, FETCH_FAILED, FETCH_VIDEO_FAILED};
use anyhow::{Context, Result};
use axum::http::StatusCode;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use vidreview_core::{AppError, Config};

/// Outcome of the word video lookup: either a video body to relay, or the
/// backend's own error document with its status.
pub enum WordVideo {
    Video(Response),
    Rejected { status: StatusCode, body: Value },
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

fn unreachable(message: &str, err: impl std::fmt::Display) -> AppError {
    AppError::BackendUnreachable {
        message: message.to_string(),
        reason: err.to_string(),
    }
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.backend_api_url(),
            Duration::from_secs(config.backend_timeout_secs()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Result<Response> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "Forwarding to annotation backend");
        self.client.post(&url).json(body).send().await
    }

    /// `POST /add_annot`. The upstream status and JSON are relayed whatever they are.
    pub async fn add_annotation(&self, body: &Value) -> Result<(StatusCode, Value), AppError> {
        let resp = self
            .post("/add_annot", body)
            .await
            .map_err(|e| unreachable(ADD_ANNOTATION_FAILED, e))?;
        let status = resp.status();
        let data = resp
            .json::<Value>()
            .await
            .map_err(|e| unreachable(ADD_ANNOTATION_FAILED, e))?;
        Ok((status, data))
    }

    /// `POST /check_user`
    pub async fn check_user(&self, body: &Value) -> Result<Value, AppError> {
        let resp = self
            .post("/check_user", body)
            .await
            .map_err(|e| unreachable(CHECK_USER_FAILED, e))?;
        Self::success_json(resp, CHECK_USER_FAILED).await
    }

    /// `GET /batches/{username}`, the batches assigned to one reviewer.
    pub async fn user_batches(&self, username: &str) -> Result<Value, AppError> {
        let url = self.build_url(&format!(
            "/batches/{}",
            utf8_percent_encode(username, NON_ALPHANUMERIC)
        ));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(FETCH_FAILED, e))?;
        Self::success_json(resp, FETCH_FAILED).await
    }

    /// `POST /batches/word/videos`
    pub async fn word_videos(&self, body: &Value) -> Result<Value, AppError> {
        let resp = self
            .post("/batches/word/videos", body)
            .await
            .map_err(|e| unreachable(FETCH_FAILED, e))?;
        Self::success_json(resp, FETCH_FAILED).await
    }

    /// `POST /batches/word/video`
    pub async fn word_video(&self, body: &Value) -> Result<WordVideo, AppError> {
        let resp = self
            .post("/batches/word/video", body)
            .await
            .map_err(|e| unreachable(FETCH_VIDEO_FAILED, e))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(WordVideo::Video(resp));
        }

        // Error bodies that are not JSON are relayed as an empty object.
        let body = resp
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Object(Default::default()));
        Ok(WordVideo::Rejected { status, body })
    }

    async fn success_json(resp: Response, failure: &str) -> Result<Value, AppError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::BackendStatus {
                status: status.as_u16(),
            });
        }
        resp.json::<Value>()
            .await
            .map_err(|e| unreachable(failure, e))
    }
}

/// Reshape the backend's batch list into `{ batches, batchList }`.
///
/// `batchList` holds the `batch` field of every entry, `null` where absent.
pub fn with_batch_list(batches: Value) -> Result<Value, AppError> {
    let entries = batches
        .as_array()
        .ok_or_else(|| unreachable(FETCH_FAILED, "batch list is not an array"))?;
    let batch_list: Vec<Value> = entries
        .iter()
        .map(|entry| entry.get("batch").cloned().unwrap_or(Value::Null))
        .collect();
    Ok(serde_json::json!({ "batches": batches, "batchList": batch_list }))
}
