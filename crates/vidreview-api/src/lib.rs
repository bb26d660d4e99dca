//! vidreview API library
//!
//! HTTP handlers, middleware, and application setup for the review server.

mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use services::streaming::{serve, VideoStream};
pub use state::AppState;
