pub mod batches;
pub mod proxy;
pub mod video_stream;
