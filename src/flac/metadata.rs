// FLAC metadata block implementation

use crate::error::{Diagnostics, ParseIssue};
use crate::utils::io::{ByteCursor, ReadResult};

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    Reserved(u8),
    Invalid,
}

impl FlacMetadataBlockType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FlacMetadataBlockType::StreamInfo,
            1 => FlacMetadataBlockType::Padding,
            2 => FlacMetadataBlockType::Application,
            3 => FlacMetadataBlockType::SeekTable,
            4 => FlacMetadataBlockType::VorbisComment,
            5 => FlacMetadataBlockType::CueSheet,
            6 => FlacMetadataBlockType::Picture,
            127 => FlacMetadataBlockType::Invalid,
            other => FlacMetadataBlockType::Reserved(other),
        }
    }
}

/// FLAC metadata block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    pub const HEADER_SIZE: usize = 4;

    /// Read FLAC metadata block header
    pub fn read(cursor: &mut ByteCursor<'_>) -> ReadResult<Self> {
        let flags = cursor.read_u8()?;
        // Length is big-endian 24-bit
        let length = cursor.read_u24_be()?;

        Ok(FlacMetadataBlockHeader {
            is_last: (flags & 0x80) != 0,
            block_type: FlacMetadataBlockType::from_byte(flags & 0x7F),
            length,
        })
    }
}

/// FLAC metadata block, borrowing its body from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacMetadataBlock<'a> {
    pub header: FlacMetadataBlockHeader,
    pub data: &'a [u8],
}

/// Walk the metadata blocks of a FLAC stream.
///
/// Stops after the block flagged as last, or at the first block whose header
/// or body does not fit in the buffer. Blocks before that point are returned.
pub fn read_blocks<'a>(buffer: &'a [u8], diagnostics: &mut Diagnostics) -> Vec<FlacMetadataBlock<'a>> {
    let mut blocks = Vec::new();
    let mut cursor = ByteCursor::new(buffer);
    match cursor.read_bytes(FLAC_SIGNATURE.len()) {
        Ok(signature) if signature == FLAC_SIGNATURE => {}
        _ => {
            diagnostics.push(ParseIssue::MissingMarker {
                expected: "fLaC",
                offset: 0,
            });
            return blocks;
        }
    }

    loop {
        let offset = cursor.position();
        let header = match FlacMetadataBlockHeader::read(&mut cursor) {
            Ok(header) => header,
            Err(e) => {
                diagnostics.push(e);
                break;
            }
        };

        let length = header.length as usize;
        let data = match cursor.read_bytes(length) {
            Ok(data) => data,
            Err(_) => {
                diagnostics.push(ParseIssue::truncated(
                    format!("FLAC {:?} block", header.block_type),
                    length,
                    cursor.remaining(),
                ));
                break;
            }
        };
        log::trace!(
            "FLAC {:?} block at offset {}, {} bytes",
            header.block_type,
            offset,
            length
        );

        blocks.push(FlacMetadataBlock { header, data });
        if header.is_last {
            break;
        }
    }

    blocks
}
