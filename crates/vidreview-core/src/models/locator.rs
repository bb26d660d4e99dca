//! Video locators and their mapping onto storage keys.
//!
//! Review clips live at `{review_prefix}/{batch}/{sign}/{filename}`, reference
//! clips at `{reference_prefix}/{filename}`. The same layout is used by every
//! storage backend.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::AppError;

/// Characters escaped when a locator segment is placed in a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    Review,
    Reference,
}

impl VideoKind {
    pub fn label(self) -> &'static str {
        match self {
            VideoKind::Review => "Review",
            VideoKind::Reference => "Reference",
        }
    }
}

/// Identifies one video clip. Built per request from path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLocator {
    Reference {
        filename: String,
    },
    Review {
        batch: String,
        sign: String,
        filename: String,
    },
}

fn validate_segment(field: &str, value: &str) -> Result<(), AppError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');
    if invalid {
        return Err(AppError::InvalidInput(format!("Invalid {}", field)));
    }
    Ok(())
}

impl VideoLocator {
    pub fn reference(filename: impl Into<String>) -> Result<Self, AppError> {
        let filename = filename.into();
        validate_segment("filename", &filename)?;
        Ok(VideoLocator::Reference { filename })
    }

    pub fn review(
        batch: impl Into<String>,
        sign: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self, AppError> {
        let (batch, sign, filename) = (batch.into(), sign.into(), filename.into());
        validate_segment("batch", &batch)?;
        validate_segment("sign", &sign)?;
        validate_segment("filename", &filename)?;
        Ok(VideoLocator::Review {
            batch,
            sign,
            filename,
        })
    }

    pub fn kind(&self) -> VideoKind {
        match self {
            VideoLocator::Reference { .. } => VideoKind::Reference,
            VideoLocator::Review { .. } => VideoKind::Review,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            VideoLocator::Reference { filename } | VideoLocator::Review { filename, .. } => {
                filename
            }
        }
    }

    /// Client-facing message when the clip does not exist.
    pub fn not_found_message(&self) -> String {
        format!("{} file not found", self.kind().label())
    }

    /// Path of the streaming endpoint that serves this clip.
    pub fn api_path(&self) -> String {
        let enc = |s: &str| utf8_percent_encode(s, PATH_SEGMENT).to_string();
        match self {
            VideoLocator::Reference { filename } => {
                format!("/api/video/reference/{}", enc(filename))
            }
            VideoLocator::Review {
                batch,
                sign,
                filename,
            } => format!(
                "/api/video/review/{}/{}/{}",
                enc(batch),
                enc(sign),
                enc(filename)
            ),
        }
    }
}

/// Folder prefixes for review and reference clips inside the storage namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLayout {
    review_prefix: String,
    reference_prefix: String,
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_matches('/').to_string()
}

fn join_key(prefix: &str, parts: &[&str]) -> String {
    let mut key = String::from(prefix);
    for part in parts {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(part);
    }
    key
}

impl VideoLayout {
    pub fn new(review_prefix: &str, reference_prefix: &str) -> Self {
        Self {
            review_prefix: normalize_prefix(review_prefix),
            reference_prefix: normalize_prefix(reference_prefix),
        }
    }

    pub fn review_prefix(&self) -> &str {
        &self.review_prefix
    }

    pub fn reference_prefix(&self) -> &str {
        &self.reference_prefix
    }

    pub fn storage_key(&self, locator: &VideoLocator) -> String {
        match locator {
            VideoLocator::Reference { filename } => {
                join_key(&self.reference_prefix, &[filename.as_str()])
            }
            VideoLocator::Review {
                batch,
                sign,
                filename,
            } => join_key(
                &self.review_prefix,
                &[batch.as_str(), sign.as_str(), filename.as_str()],
            ),
        }
    }

    /// Inverse of [`storage_key`](Self::storage_key) for review clips.
    ///
    /// Keys that are not exactly `batch/sign/filename` below the review prefix
    /// yield `None`.
    pub fn review_locator(&self, key: &str) -> Option<VideoLocator> {
        let rest = strip_key_prefix(key, &self.review_prefix)?;
        let mut parts = rest.split('/');
        let (batch, sign, filename) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        VideoLocator::review(batch, sign, filename).ok()
    }

    /// Inverse of [`storage_key`](Self::storage_key) for reference clips.
    pub fn reference_locator(&self, key: &str) -> Option<VideoLocator> {
        let rest = strip_key_prefix(key, &self.reference_prefix)?;
        if rest.contains('/') {
            return None;
        }
        VideoLocator::reference(rest).ok()
    }
}

fn strip_key_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(key);
    }
    key.strip_prefix(prefix)?.strip_prefix('/')
}
