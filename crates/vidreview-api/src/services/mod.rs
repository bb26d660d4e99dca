pub mod backend;
pub mod streaming;
pub mod video_index;
