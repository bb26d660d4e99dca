//! API constants
//!
//! Route prefix and the fixed client-facing messages of the proxy routes.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Content type of every streamed clip
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

pub const ADD_ANNOTATION_FAILED: &str = "Failed to add annotation";
pub const CHECK_USER_FAILED: &str = "Failed to reach backend";
pub const FETCH_FAILED: &str = "Failed to fetch from backend";
pub const FETCH_VIDEO_FAILED: &str = "Failed to fetch video from backend";
