// ID3 frame payload decoding

use super::v2::Id3Frame;
use crate::error::{Diagnostics, ParseIssue};
use crate::field_mapping::RawTagSet;
use crate::picture::{normalize_mime, Picture, PictureType};
use crate::utils::encoding::{decode_latin1, decode_text, split_terminated, TextEncoding};
use crate::utils::io::ByteCursor;
use crate::ExtractOptions;

/// Common ID3v2 frame identifiers
pub mod frame_ids {
    pub const TITLE: &str = "TIT2"; // Title/songname/content description
    pub const ARTIST: &str = "TPE1"; // Lead performer(s)/Soloist(s)
    pub const ALBUM: &str = "TALB"; // Album/Movie/Show title
    pub const ALBUM_ARTIST: &str = "TPE2"; // Band/orchestra/accompaniment
    pub const YEAR: &str = "TYER"; // Year (v2.3)
    pub const RECORDING_TIME: &str = "TDRC"; // Recording time (v2.4)
    pub const TRACK: &str = "TRCK"; // Track number/Position in set
    pub const DISC: &str = "TPOS"; // Part of a set
    pub const PICTURE: &str = "APIC"; // Attached picture
}

/// Resolve a frame's encoding marker, falling back to UTF-8 for unknown values.
fn text_encoding(frame_id: &str, marker: u8, diagnostics: &mut Diagnostics) -> TextEncoding {
    TextEncoding::from_byte(marker).unwrap_or_else(|| {
        diagnostics.push(ParseIssue::InvalidEncodingByte {
            frame: frame_id.to_string(),
            byte: marker,
        });
        TextEncoding::Utf8
    })
}

/// Decode text frame data: an encoding marker followed by the text.
pub fn decode_text_frame(frame_id: &str, data: &[u8], diagnostics: &mut Diagnostics) -> String {
    let Some((&marker, text)) = data.split_first() else {
        return String::new();
    };
    let encoding = text_encoding(frame_id, marker, diagnostics);
    decode_text(text, encoding)
}

/// Decode an APIC frame.
///
/// `[encoding][MIME\0][picture type][description\0 in encoding][image data]`
pub fn decode_picture_frame(
    data: &[u8],
    options: &ExtractOptions,
    diagnostics: &mut Diagnostics,
) -> Option<Picture> {
    let mut cursor = ByteCursor::new(data);
    let marker = match cursor.read_u8() {
        Ok(marker) => marker,
        Err(e) => {
            diagnostics.push(e);
            return None;
        }
    };
    let encoding = text_encoding(frame_ids::PICTURE, marker, diagnostics);

    let Some((mime, rest)) = split_terminated(cursor.rest(), TextEncoding::Latin1) else {
        diagnostics.push(ParseIssue::MissingMarker {
            expected: "APIC MIME terminator",
            offset: cursor.position(),
        });
        return None;
    };
    let mime_type = normalize_mime(&decode_latin1(mime));

    let Some((&kind, rest)) = rest.split_first() else {
        diagnostics.push(ParseIssue::truncated("APIC picture type", 1, 0));
        return None;
    };
    let Some((_description, image)) = split_terminated(rest, encoding) else {
        diagnostics.push(ParseIssue::MissingMarker {
            expected: "APIC description terminator",
            offset: data.len() - rest.len(),
        });
        return None;
    };

    if image.is_empty() {
        log::debug!("APIC frame has no image data");
        return None;
    }
    if !options.accept_picture(image.len(), diagnostics) {
        return None;
    }

    Some(Picture::new(
        mime_type,
        PictureType::from_u32(kind as u32),
        image.to_vec(),
    ))
}

/// Add one frame to the raw tag set.
///
/// Text frames are decoded under their frame id, the first usable APIC frame
/// is kept, everything else is dropped.
pub fn collect_frame(
    frame: &Id3Frame<'_>,
    raw: &mut RawTagSet,
    options: &ExtractOptions,
    diagnostics: &mut Diagnostics,
) {
    let id = frame.frame_id.as_str();
    if id == frame_ids::PICTURE {
        if options.read_picture && !raw.has_picture() {
            if let Some(picture) = decode_picture_frame(&frame.data, options, diagnostics) {
                raw.push_picture(id, picture);
            }
        }
    } else if id.starts_with('T') && id != "TXXX" {
        let text = decode_text_frame(id, &frame.data, diagnostics);
        raw.push_text(id, text);
    } else {
        log::trace!("skipping frame {}", id);
    }
}
