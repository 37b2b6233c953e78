// ID3v2 tag implementation
//
// Only major versions 3 and 4 are walked. The tag body is never trusted: its
// declared size is clamped to the buffer and every frame is checked against
// what is left before it is read.

use std::borrow::Cow;

use super::frames;
use crate::error::{Diagnostics, ParseIssue};
use crate::field_mapping::RawTagSet;
use crate::format::TagFormat;
use crate::utils::io::{ByteCursor, ReadResult};
use crate::ExtractOptions;

pub const ID3V2_SIGNATURE: &[u8; 3] = b"ID3";

/// ID3v2 header structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    pub size: u32,
}

impl Id3v2Header {
    pub const HEADER_SIZE: usize = 10;
    const FLAG_UNSYNCHRONISATION: u8 = 0x80;
    const FLAG_EXTENDED_HEADER: u8 = 0x40;

    /// Read ID3v2 header. `None` if the signature is not there.
    pub fn read(cursor: &mut ByteCursor<'_>) -> ReadResult<Option<Self>> {
        if cursor.read_bytes(3)? != ID3V2_SIGNATURE {
            return Ok(None);
        }

        let major = cursor.read_u8()?;
        let revision = cursor.read_u8()?;
        let flags = cursor.read_u8()?;
        let size = cursor.read_synchsafe_u32()?;

        Ok(Some(Id3v2Header {
            version: (major, revision),
            flags,
            size,
        }))
    }

    pub fn is_supported(&self) -> bool {
        matches!(self.version.0, 3 | 4)
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags & Self::FLAG_EXTENDED_HEADER != 0
    }

    pub fn is_unsynchronised(&self) -> bool {
        self.flags & Self::FLAG_UNSYNCHRONISATION != 0
    }

    /// ID3v2.4 uses synchsafe integers for frame sizes, ID3v2.3 plain ones.
    fn synchsafe_sizes(&self) -> bool {
        self.version.0 >= 4
    }
}

/// ID3v2 frame structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame<'a> {
    pub frame_id: String,
    pub flags: u16,
    /// Payload with format-flag prefixes and unsynchronisation removed
    pub data: Cow<'a, [u8]>,
}

impl Id3Frame<'_> {
    pub const HEADER_SIZE: usize = 10;

    pub fn into_owned(self) -> Id3Frame<'static> {
        Id3Frame {
            frame_id: self.frame_id,
            flags: self.flags,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// ID3v2 tag structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v2Tag<'a> {
    pub header: Id3v2Header,
    pub frames: Vec<Id3Frame<'a>>,
}

impl<'a> Id3v2Tag<'a> {
    /// Walk an ID3v2 tag at the start of `buffer`.
    ///
    /// Returns `None` only when no complete header is present. Anything
    /// wrong past the header ends the frame walk with the frames read so far.
    pub fn read(buffer: &'a [u8], diagnostics: &mut Diagnostics) -> Option<Self> {
        let mut cursor = ByteCursor::new(buffer);
        let header = match Id3v2Header::read(&mut cursor) {
            Ok(Some(header)) => header,
            Ok(None) => return None,
            Err(e) => {
                diagnostics.push(e);
                return None;
            }
        };
        log::debug!(
            "ID3v2.{}.{} tag, {} bytes, flags {:#04x}",
            header.version.0,
            header.version.1,
            header.size,
            header.flags
        );

        let mut tag = Id3v2Tag {
            header,
            frames: Vec::new(),
        };
        if !header.is_supported() {
            diagnostics.push(ParseIssue::UnsupportedVersion {
                major: header.version.0,
            });
            return Some(tag);
        }

        let declared = header.size as usize;
        let available = cursor.remaining();
        if declared > available {
            diagnostics.push(ParseIssue::truncated("ID3v2 tag", declared, available));
        }
        let body = &cursor.rest()[..declared.min(available)];

        // ID3v2.3 unsynchronises the whole tag body, extended header included
        let body: Cow<'a, [u8]> = if header.version.0 == 3 && header.is_unsynchronised() {
            Cow::Owned(remove_unsynchronisation(body))
        } else {
            Cow::Borrowed(body)
        };

        tag.frames = match body {
            Cow::Borrowed(body) => walk_frames(body, &header, diagnostics),
            Cow::Owned(body) => walk_frames(&body, &header, diagnostics)
                .into_iter()
                .map(Id3Frame::into_owned)
                .collect(),
        };
        Some(tag)
    }
}

fn walk_frames<'b>(
    body: &'b [u8],
    header: &Id3v2Header,
    diagnostics: &mut Diagnostics,
) -> Vec<Id3Frame<'b>> {
    let mut cursor = ByteCursor::new(body);
    let mut frames = Vec::new();

    if header.has_extended_header() {
        if let Err(issue) = skip_extended_header(&mut cursor, header) {
            diagnostics.push(issue);
            return frames;
        }
    }

    while cursor.remaining() >= Id3Frame::HEADER_SIZE {
        let offset = cursor.position();
        let (id, size, flags) = match read_frame_header(&mut cursor, header) {
            Ok(fields) => fields,
            Err(e) => {
                diagnostics.push(e);
                break;
            }
        };

        if id == [0; 4] {
            log::trace!("padding at offset {}", offset);
            break;
        }
        if !id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            diagnostics.push(ParseIssue::MissingMarker {
                expected: "ID3v2 frame id",
                offset,
            });
            break;
        }

        let frame_id: String = id.iter().map(|&b| b as char).collect();
        let size = size as usize;
        let data = match cursor.read_bytes(size) {
            Ok(data) => data,
            Err(_) => {
                diagnostics.push(ParseIssue::truncated(
                    format!("frame {}", frame_id),
                    size,
                    cursor.remaining(),
                ));
                break;
            }
        };
        log::trace!("frame {} at offset {}, {} bytes", frame_id, offset, size);

        match frame_payload(data, flags, header) {
            Ok(data) => frames.push(Id3Frame {
                frame_id,
                flags,
                data,
            }),
            Err(reason) => diagnostics.push(ParseIssue::UnsupportedFrame {
                frame: frame_id,
                reason,
            }),
        }
    }

    frames
}

fn skip_extended_header(cursor: &mut ByteCursor<'_>, header: &Id3v2Header) -> Result<(), ParseIssue> {
    let available = cursor.remaining();
    // v2.4 counts the size field itself, v2.3 does not
    let skip = if header.synchsafe_sizes() {
        let size = cursor.read_synchsafe_u32()? as usize;
        if size < 4 {
            return Err(ParseIssue::MissingMarker {
                expected: "extended header size of at least 4",
                offset: 0,
            });
        }
        size - 4
    } else {
        cursor.read_u32_be()? as usize
    };
    cursor
        .skip(skip)
        .map_err(|_| ParseIssue::truncated("ID3v2 extended header", skip, available))
}

fn read_frame_header(cursor: &mut ByteCursor<'_>, header: &Id3v2Header) -> ReadResult<([u8; 4], u32, u16)> {
    let id = cursor.read_array::<4>()?;
    let size = if header.synchsafe_sizes() {
        cursor.read_synchsafe_u32()?
    } else {
        cursor.read_u32_be()?
    };
    let flags = cursor.read_u16_be()?;
    Ok((id, size, flags))
}

/// Strip the prefixes announced by the frame's format flags.
fn frame_payload<'b>(
    data: &'b [u8],
    flags: u16,
    header: &Id3v2Header,
) -> Result<Cow<'b, [u8]>, &'static str> {
    const V3_COMPRESSION: u16 = 0x0080;
    const V3_ENCRYPTION: u16 = 0x0040;
    const V3_GROUPING: u16 = 0x0020;
    const V4_GROUPING: u16 = 0x0040;
    const V4_COMPRESSION: u16 = 0x0008;
    const V4_ENCRYPTION: u16 = 0x0004;
    const V4_UNSYNCHRONISATION: u16 = 0x0002;
    const V4_DATA_LENGTH: u16 = 0x0001;

    if header.version.0 == 3 {
        if flags & V3_COMPRESSION != 0 {
            return Err("compressed");
        }
        if flags & V3_ENCRYPTION != 0 {
            return Err("encrypted");
        }
        let prefix = if flags & V3_GROUPING != 0 { 1 } else { 0 };
        return data
            .get(prefix..)
            .map(Cow::Borrowed)
            .ok_or("group id past end of frame");
    }

    if flags & V4_COMPRESSION != 0 {
        return Err("compressed");
    }
    if flags & V4_ENCRYPTION != 0 {
        return Err("encrypted");
    }
    let mut prefix = 0;
    if flags & V4_GROUPING != 0 {
        prefix += 1;
    }
    if flags & V4_DATA_LENGTH != 0 {
        prefix += 4;
    }
    let data = data.get(prefix..).ok_or("format flag prefix past end of frame")?;
    if flags & V4_UNSYNCHRONISATION != 0 || header.is_unsynchronised() {
        Ok(Cow::Owned(remove_unsynchronisation(data)))
    } else {
        Ok(Cow::Borrowed(data))
    }
}

/// Undo unsynchronisation: every `FF 00` pair becomes `FF`.
pub fn remove_unsynchronisation(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut previous = 0u8;
    for &byte in data {
        if !(previous == 0xFF && byte == 0x00) {
            out.push(byte);
        }
        previous = byte;
    }
    out
}

/// Read an ID3v2 tag into its raw fields.
pub fn read(buffer: &[u8], options: &ExtractOptions, diagnostics: &mut Diagnostics) -> RawTagSet {
    let mut raw = RawTagSet::new(TagFormat::Id3v2);
    if let Some(tag) = Id3v2Tag::read(buffer, diagnostics) {
        for frame in &tag.frames {
            frames::collect_frame(frame, &mut raw, options, diagnostics);
        }
    }
    raw
}
