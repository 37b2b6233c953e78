// Encoding utilities

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Text encoding types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    /// `None` for marker bytes outside the four defined encodings.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TextEncoding::Latin1),
            1 => Some(TextEncoding::Utf16),
            2 => Some(TextEncoding::Utf16BE),
            3 => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    /// Width of the null terminator in this encoding.
    pub fn terminator_len(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
        }
    }
}

/// Decode text with specified encoding.
///
/// Invalid sequences become U+FFFD. Null code points and byte order marks
/// are removed and the result is trimmed. Empty input gives an empty string.
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    let decoded = match encoding {
        TextEncoding::Latin1 => encoding_rs::mem::decode_latin1(data),
        TextEncoding::Utf16 => Cow::Owned(decode_utf16_values(data)),
        TextEncoding::Utf16BE => UTF_16BE.decode_without_bom_handling(data).0,
        TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(data).0,
    };

    clean(&decoded)
}

/// Decode null-separated UTF-16 values, each behind its own optional BOM.
///
/// A value without a BOM is read as little-endian, the common writer default.
fn decode_utf16_values(data: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = data;
    while !rest.is_empty() {
        let (value, tail) = split_terminated(rest, TextEncoding::Utf16).unwrap_or((rest, &rest[rest.len()..]));
        let decoded = match Encoding::for_bom(value) {
            Some((enc, bom_len)) if enc == UTF_16LE || enc == UTF_16BE => {
                enc.decode_without_bom_handling(&value[bom_len..]).0
            }
            _ => UTF_16LE.decode_without_bom_handling(value).0,
        };
        out.push_str(&decoded);
        rest = tail;
    }
    out
}

/// Decode Latin-1 text, as used by ID3v1 fields and ID3v2 MIME strings.
pub fn decode_latin1(data: &[u8]) -> String {
    decode_text(data, TextEncoding::Latin1)
}

fn clean(text: &str) -> String {
    let stripped: String = text.chars().filter(|&c| c != '\0' && c != '\u{FEFF}').collect();
    stripped.trim().to_string()
}

/// Split `data` at the first null terminator of the given encoding.
///
/// Returns the text before the terminator and the bytes after it. For the
/// UTF-16 encodings the terminator must be a `00 00` pair on a code unit
/// boundary. `None` if there is no terminator.
pub fn split_terminated(data: &[u8], encoding: TextEncoding) -> Option<(&[u8], &[u8])> {
    match encoding.terminator_len() {
        2 => data
            .chunks_exact(2)
            .position(|unit| unit == [0, 0])
            .map(|i| (&data[..i * 2], &data[i * 2 + 2..])),
        _ => data
            .iter()
            .position(|&b| b == 0)
            .map(|i| (&data[..i], &data[i + 1..])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_maps_high_bytes() {
        assert_eq!(decode_text(b"Caf\xE9", TextEncoding::Latin1), "Café");
        // 0x80 is a C1 control in ISO-8859-1, not the euro sign
        assert_eq!(decode_text(&[0x41, 0x80], TextEncoding::Latin1), "A\u{80}");
    }

    #[test]
    fn test_utf16_with_bom() {
        let le = [0xFF, 0xFE, b'H', 0, b'i', 0];
        let be = [0xFE, 0xFF, 0, b'H', 0, b'i'];
        assert_eq!(decode_text(&le, TextEncoding::Utf16), "Hi");
        assert_eq!(decode_text(&be, TextEncoding::Utf16), "Hi");
    }

    #[test]
    fn test_utf16_values_with_own_boms() {
        let two_values = [0xFF, 0xFE, b'A', 0, 0, 0, 0xFF, 0xFE, b'B', 0];
        assert_eq!(decode_text(&two_values, TextEncoding::Utf16), "AB");

        // byte order may change between values
        let mixed = [0xFF, 0xFE, b'A', 0, 0, 0, 0xFE, 0xFF, 0, b'B', 0, 0];
        assert_eq!(decode_text(&mixed, TextEncoding::Utf16), "AB");
    }

    #[test]
    fn test_stray_bom_is_dropped() {
        assert_eq!(decode_text(&[0xFE, 0xFF, 0, b'X'], TextEncoding::Utf16BE), "X");
    }

    #[test]
    fn test_utf16_without_bom_defaults_to_le() {
        assert_eq!(decode_text(&[b'O', 0, b'k', 0], TextEncoding::Utf16), "Ok");
    }

    #[test]
    fn test_utf16be() {
        assert_eq!(decode_text(&[0, b'A', 0x00, 0xE9], TextEncoding::Utf16BE), "Aé");
    }

    #[test]
    fn test_nulls_stripped_and_trimmed() {
        assert_eq!(decode_text(b"  Title\0\0", TextEncoding::Utf8), "Title");
        assert_eq!(decode_text(b"A\0B", TextEncoding::Utf8), "AB");
        assert_eq!(decode_text(&[0xFF, 0xFE, b'X', 0, 0, 0], TextEncoding::Utf16), "X");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode_text(&[b'a', 0xFF, b'b'], TextEncoding::Utf8), "a\u{FFFD}b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode_text(&[], TextEncoding::Utf8), "");
        assert_eq!(decode_text(&[], TextEncoding::Utf16), "");
    }

    #[test]
    fn test_unknown_marker() {
        assert_eq!(TextEncoding::from_byte(3), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_byte(7), None);
    }

    #[test]
    fn test_split_terminated() {
        let (head, tail) = split_terminated(b"image/png\0\x03rest", TextEncoding::Latin1).unwrap();
        assert_eq!(head, b"image/png");
        assert_eq!(tail, b"\x03rest");

        // The 00 straddling two code units is not a terminator
        let data = [b'A', 0, 0, b'B', 0, 0, 0xFF];
        let (head, tail) = split_terminated(&data, TextEncoding::Utf16BE).unwrap();
        assert_eq!(head, &[b'A', 0, 0, b'B']);
        assert_eq!(tail, &[0xFF]);

        assert!(split_terminated(b"abc", TextEncoding::Utf8).is_none());
    }
}
