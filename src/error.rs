// Parse error taxonomy
//
// Nothing in here ever aborts an extraction. Readers record what went wrong
// and keep whatever they already collected.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A read that would run past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read of {wanted} bytes at offset {offset} exceeds buffer of {len} bytes")]
pub struct OutOfBounds {
    pub offset: usize,
    pub wanted: usize,
    pub len: usize,
}

/// Something a reader ran into while walking a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("no FLAC, ID3v2 or ID3v1 signature found")]
    UnsupportedFormat,

    #[error("out of bounds: {0}")]
    OutOfBounds(#[from] OutOfBounds),

    #[error("{region} declares {declared} bytes but only {available} are available")]
    Truncated {
        region: String,
        declared: usize,
        available: usize,
    },

    #[error("frame {frame} uses unknown text encoding {byte:#04x}, decoded as UTF-8")]
    InvalidEncodingByte { frame: String, byte: u8 },

    #[error("expected {expected} at offset {offset}")]
    MissingMarker { expected: &'static str, offset: usize },

    #[error("ID3v2.{major} tags are not supported")]
    UnsupportedVersion { major: u8 },

    #[error("frame {frame} skipped: {reason}")]
    UnsupportedFrame { frame: String, reason: &'static str },

    #[error("picture of {size} bytes exceeds the {limit} byte limit")]
    PictureTooLarge { size: usize, limit: usize },
}

impl ParseIssue {
    pub(crate) fn truncated(region: impl Into<String>, declared: usize, available: usize) -> Self {
        ParseIssue::Truncated {
            region: region.into(),
            declared,
            available,
        }
    }
}

impl Serialize for ParseIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Collects issues in the order they were hit.
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<ParseIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: impl Into<ParseIssue>) {
        let issue = issue.into();
        log::debug!("{}", issue);
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_vec(self) -> Vec<ParseIssue> {
        self.issues
    }
}
