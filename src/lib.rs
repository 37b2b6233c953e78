//! tagscan - audio tag extraction from in-memory buffers
//!
//! Recognises a leading FLAC stream, a leading ID3v2.3/2.4 tag or a trailing
//! ID3v1 tag and maps whatever it finds onto one [`TagRecord`]. Extraction
//! never fails: malformed or truncated input yields a sparser record and a
//! list of [`ParseIssue`]s describing what was skipped.
//!
//! ```
//! let record = tagscan::extract_tags(b"not an audio file");
//! assert!(record.is_empty());
//! ```

use serde::Serialize;

pub mod error;
pub mod field_mapping;
pub mod flac;
pub mod format;
pub mod id3;
pub mod picture;
pub mod utils;

pub use error::{Diagnostics, OutOfBounds, ParseIssue};
pub use format::{Container, TagFormat};
pub use picture::{Picture, PictureType};

use field_mapping::normalize;

/// Options controlling what an extraction copies out of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Copy out the first embedded picture
    pub read_picture: bool,
    /// Pictures larger than this are dropped
    pub max_picture_bytes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            read_picture: true,
            max_picture_bytes: None,
        }
    }
}

impl ExtractOptions {
    pub(crate) fn accept_picture(&self, size: usize, diagnostics: &mut Diagnostics) -> bool {
        if !self.read_picture {
            return false;
        }
        match self.max_picture_bytes {
            Some(limit) if size > limit => {
                diagnostics.push(ParseIssue::PictureTooLarge { size, limit });
                false
            }
            _ => true,
        }
    }
}

/// Format-independent tag record.
///
/// Every field is optional; `None` means the container did not carry a
/// usable value. Records are only built by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    album_artist: Option<String>,
    year: Option<String>,
    track_no: Option<u32>,
    disc_no: Option<u32>,
    picture: Option<Picture>,
}

impl TagRecord {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn album_artist(&self) -> Option<&str> {
        self.album_artist.as_deref()
    }

    /// Four-digit (or shorter) year as a decimal string
    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn track_no(&self) -> Option<u32> {
        self.track_no
    }

    pub fn disc_no(&self) -> Option<u32> {
        self.disc_no
    }

    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    pub fn into_picture(self) -> Option<Picture> {
        self.picture
    }

    /// True when no field at all was found.
    pub fn is_empty(&self) -> bool {
        *self == TagRecord::default()
    }
}

/// The outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub format: TagFormat,
    pub record: TagRecord,
    pub issues: Vec<ParseIssue>,
}

/// Detect which tag container `buffer` holds, without parsing it.
pub fn detect_format(buffer: &[u8]) -> TagFormat {
    Container::sniff(buffer).format()
}

/// Extract a tag record from a complete file buffer.
///
/// The buffer must hold at least the leading bytes of the file and, for
/// ID3v1, its final 128 bytes.
pub fn extract_tags(buffer: &[u8]) -> TagRecord {
    extract(buffer, &ExtractOptions::default()).record
}

/// Extract a tag record, reporting the container and anything skipped.
pub fn extract(buffer: &[u8], options: &ExtractOptions) -> Extraction {
    let container = Container::sniff(buffer);
    let format = container.format();
    log::debug!("detected {} container in {} byte buffer", format, buffer.len());

    let mut diagnostics = Diagnostics::new();
    let record = match container {
        Container::Flac(data) => normalize(flac::read(data, options, &mut diagnostics)),
        Container::Id3v2(data) => normalize(id3::v2::read(data, options, &mut diagnostics)),
        Container::Id3v1(trailer) => normalize(id3::v1::read(trailer)),
        Container::None => {
            diagnostics.push(ParseIssue::UnsupportedFormat);
            TagRecord::default()
        }
    };

    Extraction {
        format,
        record,
        issues: diagnostics.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::v2::tests::build_tag;

    #[test]
    fn test_unrecognised_buffer() {
        let extraction = extract(&[0u8; 64], &ExtractOptions::default());
        assert_eq!(extraction.format, TagFormat::Unknown);
        assert!(extraction.record.is_empty());
        assert_eq!(extraction.issues, vec![ParseIssue::UnsupportedFormat]);
    }

    #[test]
    fn test_id3v2_record() {
        let buffer = build_tag(
            3,
            &[
                ("TIT2", b"\x03Test Title"),
                ("TPE1", b"\x00Artist"),
                ("TPE2", b"\x00Various"),
                ("TYER", b"\x001999"),
                ("TPOS", b"\x001/2"),
            ],
        );
        let record = extract_tags(&buffer);
        assert_eq!(record.title(), Some("Test Title"));
        assert_eq!(record.artist(), Some("Artist"));
        assert_eq!(record.album_artist(), Some("Various"));
        assert_eq!(record.year(), Some("1999"));
        assert_eq!(record.disc_no(), Some(1));
        assert_eq!(record.album(), None);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"fLaC\x80\x00\x00\x00"), TagFormat::Flac);
        assert_eq!(detect_format(b"ID3\x04\x00\x00\x00\x00\x00\x00"), TagFormat::Id3v2);
        assert_eq!(detect_format(b""), TagFormat::Unknown);
    }

    #[test]
    fn test_extraction_serializes() {
        let buffer = build_tag(4, &[("TRCK", b"\x033/12")]);
        let extraction = extract(&buffer, &ExtractOptions::default());
        let json = serde_json::to_value(&extraction).unwrap();

        assert_eq!(json["format"], "id3v2");
        assert_eq!(json["record"]["track_no"], 3);
        assert!(json["record"]["title"].is_null());
        assert_eq!(json["issues"], serde_json::json!([]));
    }
}
