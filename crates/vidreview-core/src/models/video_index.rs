use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::locator::{VideoLayout, VideoLocator};

const VIDEO_EXTENSION: &str = ".mp4";

/// Videos available for one sign inside a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Stream URL of the reference clip, if one exists.
    pub reference: Option<String>,
    /// Stream URLs of the review clips, sorted.
    pub reviews: Vec<String>,
}

/// `batch -> sign -> WordEntry`, ordered for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchIndex(BTreeMap<String, BTreeMap<String, WordEntry>>);

fn is_video(name: &str) -> bool {
    name.len() > VIDEO_EXTENSION.len() && name.ends_with(VIDEO_EXTENSION)
}

impl BatchIndex {
    /// Build the index from raw storage listings.
    ///
    /// `batch_filter` restricts the output to the named batches; each of them
    /// appears even when it has no videos.
    pub fn build(
        layout: &VideoLayout,
        review_keys: &[String],
        reference_keys: &[String],
        batch_filter: Option<&[String]>,
    ) -> Self {
        let mut batches: BTreeMap<String, BTreeMap<String, WordEntry>> = BTreeMap::new();

        if let Some(filter) = batch_filter {
            for batch in filter {
                batches.entry(batch.clone()).or_default();
            }
        }

        for key in review_keys {
            let Some(locator) = layout.review_locator(key) else {
                continue;
            };
            let VideoLocator::Review {
                batch,
                sign,
                filename,
            } = &locator
            else {
                continue;
            };
            if !is_video(filename) {
                continue;
            }
            if let Some(filter) = batch_filter {
                if !filter.iter().any(|b| b == batch) {
                    continue;
                }
            }
            batches
                .entry(batch.clone())
                .or_default()
                .entry(sign.clone())
                .or_default()
                .reviews
                .push(locator.api_path());
        }

        let references: HashMap<String, String> = reference_keys
            .iter()
            .filter_map(|key| layout.reference_locator(key))
            .filter(|locator| is_video(locator.filename()))
            .map(|locator| {
                let filename = locator.filename();
                let sign = filename[..filename.len() - VIDEO_EXTENSION.len()].to_string();
                (sign, locator.api_path())
            })
            .collect();

        for signs in batches.values_mut() {
            for (sign, entry) in signs.iter_mut() {
                entry.reviews.sort();
                entry.reference = references.get(sign).cloned();
            }
        }

        Self(batches)
    }

    /// First batch, in sorted order, containing `word`.
    pub fn find_word(&self, word: &str) -> Option<(&str, &WordEntry)> {
        self.0
            .iter()
            .find_map(|(batch, signs)| signs.get(word).map(|entry| (batch.as_str(), entry)))
    }

    pub fn batches(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
