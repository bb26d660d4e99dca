//! Route configuration and setup.

mod health;

use crate::constants::API_PREFIX;
use crate::handlers::{batches, proxy, video_stream};
use crate::middleware::{request_id_middleware, RequestId};
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vidreview_core::Config;

/// Players read these to drive seeking.
const EXPOSED_HEADERS: [HeaderName; 3] = [
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
    header::CONTENT_LENGTH,
];

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default();
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let app = api_routes()
        .route("/health", get(health::health_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<Arc<AppState>> {
    let api = Router::new()
        .route(
            "/video/review/{batch}/{sign}/{filename}",
            get(video_stream::stream_review),
        )
        .route(
            "/video/reference/{filename}",
            get(video_stream::stream_reference),
        )
        .route("/batches", get(batches::list_batches))
        .route("/words/{word}", get(batches::get_word))
        .route("/add_annot", post(proxy::add_annotation))
        .route("/check_user", post(proxy::check_user))
        .route("/batches/{username}", get(proxy::user_batches))
        .route("/batches/word/videos", post(proxy::word_videos))
        .route("/batches/word/video", post(proxy::word_video));

    Router::new().nest(API_PREFIX, api)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            return Err(anyhow::anyhow!(
                "CORS cannot allow all origins in production"
            ));
        }
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(EXPOSED_HEADERS)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(EXPOSED_HEADERS)
    };
    Ok(cors)
}
