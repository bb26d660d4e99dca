//! HTTP byte ranges (single-range subset of RFC 7233).

use std::ops::Range;

/// Inclusive byte range `[start, end]` inside an object of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Number of bytes covered; never zero.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false: a range holds at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Same range as a half-open `start..end + 1`, the form object stores expect.
    pub fn as_exclusive(&self) -> Range<u64> {
        self.start..self.end + 1
    }

    /// `Content-Range` header value for a partial response.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

/// A parsed but not yet size-checked `Range` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    /// `None` for open-ended requests like `bytes=500-`.
    pub end: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range start is missing or not a number: {0:?}")]
    InvalidStart(String),

    #[error("range end is not a number: {0:?}")]
    InvalidEnd(String),

    #[error("range start {start} is past range end {end}")]
    Inverted { start: u64, end: u64 },

    #[error("range start {start} is outside an object of {size} bytes")]
    StartOutOfBounds { start: u64, size: u64 },
}

/// Parse a `Range` header value of the form `bytes=<start>-[<end>]`.
///
/// Returns `Ok(None)` when the header uses a unit other than `bytes`; such
/// headers are ignored and the whole object is served. Only a single range is
/// understood: in `bytes=0-10,20-30` the end component is `10,20-30`, which is
/// rejected as [`RangeError::InvalidEnd`].
pub fn parse_range_header(value: &str) -> Result<Option<RangeSpec>, RangeError> {
    let Some(spec) = value.trim().strip_prefix("bytes=") else {
        return Ok(None);
    };

    let (start_str, end_str) = match spec.split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (spec.trim(), ""),
    };

    let start: u64 = start_str
        .parse()
        .map_err(|_| RangeError::InvalidStart(start_str.to_string()))?;

    let end = if end_str.is_empty() {
        None
    } else {
        Some(
            end_str
                .parse::<u64>()
                .map_err(|_| RangeError::InvalidEnd(end_str.to_string()))?,
        )
    };

    Ok(Some(RangeSpec { start, end }))
}

impl RangeSpec {
    /// Resolve against the object size.
    ///
    /// An omitted end means "to the last byte". An end past the object is
    /// clamped to `size - 1`; a start past the object is unsatisfiable.
    pub fn resolve(self, size: u64) -> Result<ByteRange, RangeError> {
        if let Some(end) = self.end {
            if end < self.start {
                return Err(RangeError::Inverted {
                    start: self.start,
                    end,
                });
            }
        }

        if self.start >= size {
            return Err(RangeError::StartOutOfBounds {
                start: self.start,
                size,
            });
        }

        let last = size - 1;
        let end = self.end.map_or(last, |end| end.min(last));

        ByteRange::new(self.start, end).ok_or(RangeError::Inverted {
            start: self.start,
            end,
        })
    }
}
