//! Domain models for the review server.

mod byte_range;
mod locator;
mod video_index;

pub use byte_range::{parse_range_header, ByteRange, RangeError, RangeSpec};
pub use locator::{VideoKind, VideoLayout, VideoLocator};
pub use video_index::{BatchIndex, WordEntry};
