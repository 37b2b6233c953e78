// ID3v1 tag implementation

use crate::field_mapping::{FieldMappings, RawTagSet};
use crate::format::TagFormat;
use crate::utils::encoding::decode_latin1;

pub const TAG_SIZE: usize = 128;
pub const TAG_ID: &[u8; 3] = b"TAG";

/// ID3v1 tag structure
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub track: Option<u8>,
}

impl Id3v1Tag {
    /// The last 128 bytes of `buffer`, if they start with `TAG`.
    pub fn trailer(buffer: &[u8]) -> Option<&[u8; TAG_SIZE]> {
        let start = buffer.len().checked_sub(TAG_SIZE)?;
        let trailer: &[u8; TAG_SIZE] = buffer[start..].try_into().ok()?;
        if &trailer[0..3] != TAG_ID {
            return None;
        }
        Some(trailer)
    }

    /// Parse ID3v1 tag from the 128-byte trailer
    pub fn parse(buffer: &[u8; TAG_SIZE]) -> Self {
        let title = Self::parse_string(&buffer[3..33]);
        let artist = Self::parse_string(&buffer[33..63]);
        let album = Self::parse_string(&buffer[63..93]);
        let year = Self::parse_string(&buffer[93..97]);

        // ID3v1.1 keeps the track in byte 126 behind a zero byte at 125;
        // otherwise 125..127 are still comment text.
        let track = if buffer[125] == 0 && buffer[126] != 0 {
            Some(buffer[126])
        } else {
            None
        };

        Id3v1Tag {
            title,
            artist,
            album,
            year,
            track,
        }
    }

    /// Parse null-terminated string
    fn parse_string(bytes: &[u8]) -> String {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        decode_latin1(&bytes[..end])
    }

    pub fn into_raw(self) -> RawTagSet {
        let mut raw = RawTagSet::new(TagFormat::Id3v1);
        raw.push_text(FieldMappings::ID3V1_TITLE, self.title);
        raw.push_text(FieldMappings::ID3V1_ARTIST, self.artist);
        raw.push_text(FieldMappings::ID3V1_ALBUM, self.album);
        raw.push_text(FieldMappings::ID3V1_YEAR, self.year);
        if let Some(track) = self.track {
            raw.push_text(FieldMappings::ID3V1_TRACK, track.to_string());
        }
        raw
    }
}

/// Read the raw fields of an ID3v1 trailer.
pub fn read(trailer: &[u8; TAG_SIZE]) -> RawTagSet {
    let tag = Id3v1Tag::parse(trailer);
    log::trace!("ID3v1 tag: {:?}", tag);
    tag.into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_mapping::normalize;

    fn build_trailer(title: &str, artist: &str, year: &str, track: u8) -> [u8; TAG_SIZE] {
        let mut tag = [0u8; TAG_SIZE];
        tag[..3].copy_from_slice(TAG_ID);
        tag[3..3 + title.len()].copy_from_slice(title.as_bytes());
        tag[33..33 + artist.len()].copy_from_slice(artist.as_bytes());
        tag[93..93 + year.len()].copy_from_slice(year.as_bytes());
        tag[126] = track;
        tag[127] = 0xFF;
        tag
    }

    #[test]
    fn test_parse_fields() {
        let trailer = build_trailer("Song", "Band   ", "1997", 4);
        let tag = Id3v1Tag::parse(&trailer);

        assert_eq!(tag.title, "Song");
        assert_eq!(tag.artist, "Band");
        assert_eq!(tag.album, "");
        assert_eq!(tag.year, "1997");
        assert_eq!(tag.track, Some(4));
    }

    #[test]
    fn test_zero_track_is_absent() {
        let trailer = build_trailer("Song", "", "", 0);
        assert_eq!(Id3v1Tag::parse(&trailer).track, None);
    }

    #[test]
    fn test_v10_comment_is_not_a_track() {
        let mut trailer = build_trailer("Song", "", "", 0);
        trailer[97..127].copy_from_slice(&[b'c'; 30]);
        assert_eq!(Id3v1Tag::parse(&trailer).track, None);

        trailer[125] = b'x';
        trailer[126] = 7;
        assert_eq!(Id3v1Tag::parse(&trailer).track, None);
    }

    #[test]
    fn test_latin1_title() {
        let mut trailer = build_trailer("", "", "", 0);
        trailer[3..7].copy_from_slice(b"Caf\xE9");
        assert_eq!(Id3v1Tag::parse(&trailer).title, "Café");
    }

    #[test]
    fn test_trailer_lookup() {
        let mut buffer = vec![0xAB; 40];
        buffer.extend_from_slice(&build_trailer("Song", "", "", 0));
        assert!(Id3v1Tag::trailer(&buffer).is_some());
        assert!(Id3v1Tag::trailer(&buffer[..100]).is_none());
        assert!(Id3v1Tag::trailer(&buffer[..buffer.len() - 1]).is_none());
    }

    #[test]
    fn test_normalized_record() {
        let record = normalize(read(&build_trailer("Song", "Band", "2001", 9)));
        assert_eq!(record.title(), Some("Song"));
        assert_eq!(record.artist(), Some("Band"));
        assert_eq!(record.album(), None);
        assert_eq!(record.year(), Some("2001"));
        assert_eq!(record.track_no(), Some(9));
        assert_eq!(record.disc_no(), None);
    }
}
