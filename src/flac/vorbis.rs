// VORBIS_COMMENT implementation for FLAC

use crate::error::{Diagnostics, ParseIssue};
use crate::utils::io::ByteCursor;

/// Vorbis comment structure
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_string: String,
    /// `(key, value)` pairs in block order, keys lower-cased
    pub comments: Vec<(String, String)>,
}

impl VorbisComment {
    /// Parse a VORBIS_COMMENT block body.
    ///
    /// All lengths are little-endian. A length that overruns the block ends
    /// the comment list; the comments before it are kept.
    pub fn parse(data: &[u8], diagnostics: &mut Diagnostics) -> Self {
        let mut cursor = ByteCursor::new(data);
        let mut vorbis = VorbisComment::default();

        let vendor = cursor
            .read_u32_le()
            .and_then(|len| cursor.read_bytes(len as usize));
        match vendor {
            Ok(bytes) => vorbis.vendor_string = String::from_utf8_lossy(bytes).into_owned(),
            Err(e) => {
                diagnostics.push(e);
                return vorbis;
            }
        }

        let count = match cursor.read_u32_le() {
            Ok(count) => count,
            Err(e) => {
                diagnostics.push(e);
                return vorbis;
            }
        };

        for index in 0..count {
            let length = match cursor.read_u32_le() {
                Ok(length) => length as usize,
                Err(e) => {
                    diagnostics.push(e);
                    break;
                }
            };
            let bytes = match cursor.read_bytes(length) {
                Ok(bytes) => bytes,
                Err(_) => {
                    diagnostics.push(ParseIssue::truncated(
                        format!("Vorbis comment {}", index),
                        length,
                        cursor.remaining(),
                    ));
                    break;
                }
            };

            // Parse comment (format: FIELD=value)
            let comment = String::from_utf8_lossy(bytes);
            match comment.split_once('=') {
                Some((field, value)) => vorbis
                    .comments
                    .push((field.to_ascii_lowercase(), value.trim().to_string())),
                None => log::trace!("Vorbis comment {} has no '='", index),
            }
        }

        vorbis
    }

    /// Get the last value of a field, compared case-insensitively
    pub fn get(&self, field: &str) -> Option<&str> {
        self.comments
            .iter()
            .rev()
            .find(|(f, _)| f.eq_ignore_ascii_case(field))
            .map(|(_, v)| v.as_str())
    }
}
