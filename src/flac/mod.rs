// FLAC metadata handling module

pub mod metadata;
pub mod picture;
pub mod vorbis;

pub use metadata::{FlacMetadataBlock, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use picture::FlacPicture;
pub use vorbis::VorbisComment;

use crate::error::Diagnostics;
use crate::field_mapping::{FieldMappings, RawTagSet};
use crate::format::TagFormat;
use crate::ExtractOptions;

/// Read the Vorbis comments and first usable picture of a FLAC stream.
pub fn read(buffer: &[u8], options: &ExtractOptions, diagnostics: &mut Diagnostics) -> RawTagSet {
    let mut raw = RawTagSet::new(TagFormat::Flac);

    for block in metadata::read_blocks(buffer, diagnostics) {
        match block.header.block_type {
            FlacMetadataBlockType::VorbisComment => {
                let vorbis = VorbisComment::parse(block.data, diagnostics);
                log::debug!(
                    "Vorbis comment block from {:?}, {} comments",
                    vorbis.vendor_string,
                    vorbis.comments.len()
                );
                for (key, value) in vorbis.comments {
                    raw.push_text(key, value);
                }
            }
            FlacMetadataBlockType::Picture if options.read_picture && !raw.has_picture() => {
                if let Some(picture) = picture::read_picture(block.data, options, diagnostics) {
                    raw.push_picture(FieldMappings::FLAC_PICTURE, picture);
                }
            }
            _ => {}
        }
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseIssue;
    use crate::field_mapping::normalize;
    use metadata::tests::{block, stream};
    use picture::tests::picture_block;
    use vorbis::tests::comment_block;

    #[test]
    fn test_comments_and_picture() {
        let buffer = stream(&[
            block(0, false, &[0; 34]),
            block(4, false, &comment_block("x", &["TITLE=Song", "TRACKNUMBER=3/12", "DiscNumber=2"])),
            block(6, true, &picture_block(3, "image/png", &[1, 2])),
        ]);

        let record = normalize(read(&buffer, &ExtractOptions::default(), &mut Diagnostics::new()));
        assert_eq!(record.title(), Some("Song"));
        assert_eq!(record.track_no(), Some(3));
        assert_eq!(record.disc_no(), Some(2));
        assert_eq!(record.picture().map(|p| p.data()), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_bad_picture_does_not_stop_later_blocks() {
        let mut bad = picture_block(3, "image/png", &[1, 2]);
        let len_at = bad.len() - 2 - 4;
        bad[len_at..len_at + 4].copy_from_slice(&99u32.to_be_bytes());

        let buffer = stream(&[
            block(6, false, &bad),
            block(6, false, &picture_block(4, "image/gif", &[7])),
            block(4, true, &comment_block("", &["album=Record"])),
        ]);

        let mut diagnostics = Diagnostics::new();
        let record = normalize(read(&buffer, &ExtractOptions::default(), &mut diagnostics));
        assert_eq!(record.album(), Some("Record"));
        assert_eq!(record.picture().map(|p| p.mime_type()), Some("image/gif"));
        assert!(matches!(
            &diagnostics.into_vec()[..],
            [ParseIssue::Truncated { declared: 99, .. }]
        ));
    }

    #[test]
    fn test_comments_before_truncated_block_survive() {
        let mut buffer = stream(&[
            block(4, false, &comment_block("", &["ARTIST=Band"])),
            block(6, true, &picture_block(3, "image/png", &[1, 2, 3])),
        ]);
        buffer.truncate(buffer.len() - 2);

        let record = normalize(read(&buffer, &ExtractOptions::default(), &mut Diagnostics::new()));
        assert_eq!(record.artist(), Some("Band"));
        assert!(record.picture().is_none());
    }
}
