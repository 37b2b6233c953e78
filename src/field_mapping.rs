// Unified metadata field mapping
//
// Each reader reports what it found under its own field names:
// - ID3v2: Frame IDs (TIT2, TPE1, TALB, etc.)
// - FLAC: Vorbis Comment keys, lower-cased (title, artist, album, etc.)
// - ID3v1: fixed slot names (title, artist, album, year, track)
//
// This module maps those onto the common record.

use crate::format::TagFormat;
use crate::picture::Picture;
use crate::TagRecord;

/// Standard metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Year,
    Track,
    Disc,
    Cover,
}

impl StandardField {
    /// Get standard field name (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Title => "title",
            StandardField::Artist => "artist",
            StandardField::Album => "album",
            StandardField::AlbumArtist => "album_artist",
            StandardField::Year => "year",
            StandardField::Track => "track",
            StandardField::Disc => "disc",
            StandardField::Cover => "cover",
        }
    }
}

/// A value exactly as a reader pulled it out of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Picture(Picture),
}

/// A format-specific key paired with its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrameValue {
    pub key: String,
    pub value: RawValue,
}

/// Everything one reader collected, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTagSet {
    pub format: TagFormat,
    pub values: Vec<RawFrameValue>,
}

impl RawTagSet {
    pub fn new(format: TagFormat) -> Self {
        RawTagSet {
            format,
            values: Vec::new(),
        }
    }

    pub fn push_text(&mut self, key: impl Into<String>, text: String) {
        self.values.push(RawFrameValue {
            key: key.into(),
            value: RawValue::Text(text),
        });
    }

    pub fn push_picture(&mut self, key: impl Into<String>, picture: Picture) {
        self.values.push(RawFrameValue {
            key: key.into(),
            value: RawValue::Picture(picture),
        });
    }

    pub fn has_picture(&self) -> bool {
        self.values
            .iter()
            .any(|v| matches!(v.value, RawValue::Picture(_)))
    }
}

/// Format-specific field mappings
pub struct FieldMappings;

impl FieldMappings {
    // ID3v2 frame IDs
    pub const ID3V2_TITLE: &'static str = "TIT2";
    pub const ID3V2_ARTIST: &'static str = "TPE1";
    pub const ID3V2_ALBUM: &'static str = "TALB";
    pub const ID3V2_ALBUM_ARTIST: &'static str = "TPE2";
    pub const ID3V2_YEAR: &'static str = "TDRC";
    pub const ID3V2_YEAR_LEGACY: &'static str = "TYER";
    pub const ID3V2_TRACK: &'static str = "TRCK";
    pub const ID3V2_DISC: &'static str = "TPOS";
    pub const ID3V2_COVER: &'static str = "APIC";

    // Vorbis Comment keys, compared case-insensitively
    pub const VORBIS_TITLE: &'static str = "title";
    pub const VORBIS_ARTIST: &'static str = "artist";
    pub const VORBIS_ALBUM: &'static str = "album";
    pub const VORBIS_ALBUM_ARTIST: &'static str = "albumartist";
    pub const VORBIS_YEAR: &'static str = "date";
    pub const VORBIS_TRACK: &'static str = "tracknumber";
    pub const VORBIS_DISC: &'static str = "discnumber";

    // ID3v1 slots
    pub const ID3V1_TITLE: &'static str = "title";
    pub const ID3V1_ARTIST: &'static str = "artist";
    pub const ID3V1_ALBUM: &'static str = "album";
    pub const ID3V1_YEAR: &'static str = "year";
    pub const ID3V1_TRACK: &'static str = "track";

    /// Key under which FLAC PICTURE blocks are reported
    pub const FLAC_PICTURE: &'static str = "picture";

    /// Convert ID3v2 frame to standard field
    pub fn from_id3v2(frame_id: &str) -> Option<StandardField> {
        match frame_id {
            Self::ID3V2_TITLE => Some(StandardField::Title),
            Self::ID3V2_ARTIST => Some(StandardField::Artist),
            Self::ID3V2_ALBUM => Some(StandardField::Album),
            Self::ID3V2_ALBUM_ARTIST => Some(StandardField::AlbumArtist),
            Self::ID3V2_YEAR | Self::ID3V2_YEAR_LEGACY => Some(StandardField::Year),
            Self::ID3V2_TRACK => Some(StandardField::Track),
            Self::ID3V2_DISC => Some(StandardField::Disc),
            Self::ID3V2_COVER => Some(StandardField::Cover),
            _ => None,
        }
    }

    /// Convert Vorbis Comment key to standard field
    pub fn from_vorbis(key: &str) -> Option<StandardField> {
        match key.to_ascii_lowercase().as_str() {
            Self::VORBIS_TITLE => Some(StandardField::Title),
            Self::VORBIS_ARTIST => Some(StandardField::Artist),
            Self::VORBIS_ALBUM => Some(StandardField::Album),
            Self::VORBIS_ALBUM_ARTIST => Some(StandardField::AlbumArtist),
            Self::VORBIS_YEAR | "year" => Some(StandardField::Year),
            Self::VORBIS_TRACK => Some(StandardField::Track),
            Self::VORBIS_DISC => Some(StandardField::Disc),
            Self::FLAC_PICTURE => Some(StandardField::Cover),
            _ => None,
        }
    }

    pub fn from_id3v1(key: &str) -> Option<StandardField> {
        match key {
            Self::ID3V1_TITLE => Some(StandardField::Title),
            Self::ID3V1_ARTIST => Some(StandardField::Artist),
            Self::ID3V1_ALBUM => Some(StandardField::Album),
            Self::ID3V1_YEAR => Some(StandardField::Year),
            Self::ID3V1_TRACK => Some(StandardField::Track),
            _ => None,
        }
    }

    pub fn lookup(format: TagFormat, key: &str) -> Option<StandardField> {
        match format {
            TagFormat::Id3v2 => Self::from_id3v2(key),
            TagFormat::Flac => Self::from_vorbis(key),
            TagFormat::Id3v1 => Self::from_id3v1(key),
            TagFormat::Unknown => None,
        }
    }
}

/// Value converter for the numeric fields
pub struct ValueConverter;

impl ValueConverter {
    /// Leading run of decimal digits before any `/` ("3/12" -> 3).
    pub fn parse_number(value: &str) -> Option<u32> {
        let head = value.split('/').next().unwrap_or(value).trim();
        let digits: &str = &head[..head
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(head.len())];
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }

    /// The first four characters read as a positive integer ("2024-01-15" -> 2024).
    pub fn parse_year(value: &str) -> Option<u32> {
        let head: String = value.trim().chars().take(4).collect();
        if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        head.parse().ok().filter(|&year| year > 0)
    }
}

/// Accumulates fields during a parse and freezes them into a [`TagRecord`].
#[derive(Debug, Default)]
pub struct TagRecordBuilder {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    album_artist: Option<String>,
    year: Option<String>,
    track_no: Option<u32>,
    disc_no: Option<u32>,
    picture: Option<Picture>,
}

impl TagRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later non-empty values replace earlier ones; empty or unparseable
    /// values leave the field as it was.
    pub fn set_text(&mut self, field: StandardField, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match field {
            StandardField::Title => self.title = Some(value.to_string()),
            StandardField::Artist => self.artist = Some(value.to_string()),
            StandardField::Album => self.album = Some(value.to_string()),
            StandardField::AlbumArtist => self.album_artist = Some(value.to_string()),
            StandardField::Year => {
                if let Some(year) = ValueConverter::parse_year(value) {
                    self.year = Some(year.to_string());
                }
            }
            StandardField::Track => {
                if let Some(n) = ValueConverter::parse_number(value) {
                    self.track_no = Some(n);
                }
            }
            StandardField::Disc => {
                if let Some(n) = ValueConverter::parse_number(value) {
                    self.disc_no = Some(n);
                }
            }
            StandardField::Cover => {}
        }
    }

    /// First picture wins.
    pub fn offer_picture(&mut self, picture: Picture) {
        if self.picture.is_none() {
            self.picture = Some(picture);
        }
    }

    pub fn build(self) -> TagRecord {
        TagRecord {
            title: self.title,
            artist: self.artist,
            album: self.album,
            album_artist: self.album_artist,
            year: self.year,
            track_no: self.track_no,
            disc_no: self.disc_no,
            picture: self.picture,
        }
    }
}

/// Map a reader's raw field set onto the common record.
pub fn normalize(raw: RawTagSet) -> TagRecord {
    let mut builder = TagRecordBuilder::new();
    for RawFrameValue { key, value } in raw.values {
        let Some(field) = FieldMappings::lookup(raw.format, &key) else {
            log::trace!("ignoring {:?} field {}", raw.format, key);
            continue;
        };
        match value {
            RawValue::Text(text) => builder.set_text(field, &text),
            RawValue::Picture(picture) => builder.offer_picture(picture),
        }
    }
    builder.build()
}
