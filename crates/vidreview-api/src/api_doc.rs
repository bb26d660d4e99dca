//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidreview API",
        version = "0.1.0",
        description = "Range-request video streaming for sign-language review, with the batch \
                       index and annotation backend routes."
    ),
    paths(
        // Videos
        handlers::video_stream::stream_review,
        handlers::video_stream::stream_reference,
        // Batch index
        handlers::batches::list_batches,
        handlers::batches::get_word,
        // Annotation backend
        handlers::proxy::add_annotation,
        handlers::proxy::check_user,
        handlers::proxy::user_batches,
        handlers::proxy::word_videos,
        handlers::proxy::word_video,
    ),
    components(
        schemas(
            handlers::batches::WordResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Byte-range streaming of review and reference clips"),
        (name = "batches", description = "Batches, signs and clip URLs discovered in storage"),
        (name = "backend", description = "Annotation backend pass-through")
    )
)]
pub struct ApiDoc;
