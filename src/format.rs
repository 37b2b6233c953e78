// Container detection
//
// Exactly one container is chosen per buffer, by leading magic bytes first
// and the ID3v1 trailer last.

use serde::Serialize;

use crate::flac::FLAC_SIGNATURE;
use crate::id3::v1::{self, Id3v1Tag};
use crate::id3::v2::ID3V2_SIGNATURE;

/// The tag container a buffer was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFormat {
    Flac,
    Id3v2,
    Id3v1,
    Unknown,
}

impl TagFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagFormat::Flac => "FLAC",
            TagFormat::Id3v2 => "ID3v2",
            TagFormat::Id3v1 => "ID3v1",
            TagFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TagFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen container and the bytes its reader needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container<'a> {
    /// Whole buffer, starting at `fLaC`
    Flac(&'a [u8]),
    /// Whole buffer, starting at `ID3`
    Id3v2(&'a [u8]),
    /// The trailing 128 bytes, starting at `TAG`
    Id3v1(&'a [u8; v1::TAG_SIZE]),
    None,
}

impl<'a> Container<'a> {
    pub fn sniff(buffer: &'a [u8]) -> Self {
        if buffer.starts_with(FLAC_SIGNATURE) {
            return Container::Flac(buffer);
        }
        if buffer.starts_with(ID3V2_SIGNATURE) {
            return Container::Id3v2(buffer);
        }
        match Id3v1Tag::trailer(buffer) {
            Some(trailer) => Container::Id3v1(trailer),
            None => Container::None,
        }
    }

    pub fn format(&self) -> TagFormat {
        match self {
            Container::Flac(_) => TagFormat::Flac,
            Container::Id3v2(_) => TagFormat::Id3v2,
            Container::Id3v1(_) => TagFormat::Id3v1,
            Container::None => TagFormat::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_trailer(mut body: Vec<u8>) -> Vec<u8> {
        let mut trailer = [0u8; 128];
        trailer[..3].copy_from_slice(b"TAG");
        body.extend_from_slice(&trailer);
        body
    }

    #[test]
    fn test_flac_wins_over_trailer() {
        let buffer = with_trailer(b"fLaC".to_vec());
        assert_eq!(Container::sniff(&buffer).format(), TagFormat::Flac);
    }

    #[test]
    fn test_id3v2_wins_over_trailer() {
        let buffer = with_trailer(b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec());
        assert_eq!(Container::sniff(&buffer).format(), TagFormat::Id3v2);
    }

    #[test]
    fn test_trailer_fallback() {
        let buffer = with_trailer(vec![0xFF, 0xFB, 0x90, 0x00]);
        assert_eq!(Container::sniff(&buffer).format(), TagFormat::Id3v1);
    }

    #[test]
    fn test_nothing_recognised() {
        assert_eq!(Container::sniff(b"RIFF....WAVE"), Container::None);
        assert_eq!(Container::sniff(&[]), Container::None);
        assert_eq!(Container::sniff(b"fLa"), Container::None);
    }
}
