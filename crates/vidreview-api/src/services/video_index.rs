//! Batch index built from a live storage listing.

use vidreview_core::{AppError, BatchIndex, VideoLayout};
use vidreview_storage::Storage;

/// List review and reference folders and assemble the batch index.
///
/// The listing is taken at call time so newly uploaded clips show up
/// without a restart.
pub async fn load_index(
    storage: &dyn Storage,
    layout: &VideoLayout,
    batch_filter: Option<&[String]>,
) -> Result<BatchIndex, AppError> {
    let review_keys = storage
        .list(layout.review_prefix())
        .await
        .map_err(|e| AppError::VideoIndex(format!("listing {}: {}", layout.review_prefix(), e)))?;

    let reference_keys = storage
        .list(layout.reference_prefix())
        .await
        .map_err(|e| {
            AppError::VideoIndex(format!("listing {}: {}", layout.reference_prefix(), e))
        })?;

    let index = BatchIndex::build(layout, &review_keys, &reference_keys, batch_filter);

    tracing::debug!(
        review_objects = review_keys.len(),
        reference_objects = reference_keys.len(),
        batches = index.batches().count(),
        "Video index built"
    );

    Ok(index)
}
