// FLAC PICTURE block implementation

use crate::error::{Diagnostics, ParseIssue};
use crate::picture::{normalize_mime, Picture, PictureType};
use crate::utils::io::{ByteCursor, ReadResult};
use crate::ExtractOptions;

/// MIME type marking the picture data as a URL rather than an image
const LINKED_IMAGE_MIME: &str = "-->";

/// FLAC PICTURE block structure, borrowing the image from the block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacPicture<'a> {
    pub picture_type: PictureType,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl<'a> FlacPicture<'a> {
    /// Read FLAC PICTURE block from data. All integers are big-endian.
    pub fn read_from_data(data: &'a [u8]) -> Result<Self, ParseIssue> {
        let mut cursor = ByteCursor::new(data);

        let picture_type = PictureType::from_u32(cursor.read_u32_be()?);
        let mime_type = String::from_utf8_lossy(read_counted(&mut cursor)?).into_owned();
        let description = String::from_utf8_lossy(read_counted(&mut cursor)?).into_owned();
        let width = cursor.read_u32_be()?;
        let height = cursor.read_u32_be()?;
        let _depth = cursor.read_u32_be()?;
        let _colors = cursor.read_u32_be()?;

        let data_length = cursor.read_u32_be()? as usize;
        let available = cursor.remaining();
        let data = cursor
            .read_bytes(data_length)
            .map_err(|_| ParseIssue::truncated("FLAC picture data", data_length, available))?;

        Ok(FlacPicture {
            picture_type,
            mime_type,
            description,
            width,
            height,
            data,
        })
    }

    /// Copy the image out, unless it is linked, empty or over the size limit.
    pub fn into_picture(self, options: &ExtractOptions, diagnostics: &mut Diagnostics) -> Option<Picture> {
        if self.mime_type == LINKED_IMAGE_MIME {
            log::debug!("skipping linked FLAC picture");
            return None;
        }
        if self.data.is_empty() {
            log::debug!("FLAC picture block has no image data");
            return None;
        }
        if !options.accept_picture(self.data.len(), diagnostics) {
            return None;
        }
        log::debug!(
            "FLAC picture: {}, {}x{}, {} bytes, {:?}",
            self.mime_type,
            self.width,
            self.height,
            self.data.len(),
            self.description
        );
        Some(Picture::new(
            normalize_mime(&self.mime_type),
            self.picture_type,
            self.data.to_vec(),
        ))
    }
}

/// A 32-bit big-endian length followed by that many bytes
fn read_counted<'a>(cursor: &mut ByteCursor<'a>) -> ReadResult<&'a [u8]> {
    let length = cursor.read_u32_be()? as usize;
    cursor.read_bytes(length)
}

/// Parse a PICTURE block body into a picture, recording why if it yields none.
pub fn read_picture(data: &[u8], options: &ExtractOptions, diagnostics: &mut Diagnostics) -> Option<Picture> {
    match FlacPicture::read_from_data(data) {
        Ok(picture) => picture.into_picture(options, diagnostics),
        Err(issue) => {
            diagnostics.push(issue);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn picture_block(kind: u32, mime: &str, image: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&kind.to_be_bytes());
        out.extend_from_slice(&(mime.len() as u32).to_be_bytes());
        out.extend_from_slice(mime.as_bytes());
        let description = "cover";
        out.extend_from_slice(&(description.len() as u32).to_be_bytes());
        out.extend_from_slice(description.as_bytes());
        out.extend_from_slice(&500u32.to_be_bytes()); // width
        out.extend_from_slice(&400u32.to_be_bytes()); // height
        out.extend_from_slice(&24u32.to_be_bytes()); // depth
        out.extend_from_slice(&0u32.to_be_bytes()); // colors
        out.extend_from_slice(&(image.len() as u32).to_be_bytes());
        out.extend_from_slice(image);
        out
    }

    #[test]
    fn test_read_from_data() {
        let data = picture_block(3, "image/png", &[1, 2, 3, 4]);
        let picture = FlacPicture::read_from_data(&data).unwrap();

        assert_eq!(picture.picture_type, PictureType::CoverFront);
        assert_eq!(picture.mime_type, "image/png");
        assert_eq!(picture.description, "cover");
        assert_eq!((picture.width, picture.height), (500, 400));
        assert_eq!(picture.data, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_data_length_overrun() {
        let mut data = picture_block(3, "image/png", &[1, 2, 3, 4]);
        let len_at = data.len() - 4 - 4;
        data[len_at..len_at + 4].copy_from_slice(&5000u32.to_be_bytes());

        let mut diagnostics = Diagnostics::new();
        assert!(read_picture(&data, &ExtractOptions::default(), &mut diagnostics).is_none());
        assert!(matches!(
            &diagnostics.into_vec()[..],
            [ParseIssue::Truncated { declared: 5000, available: 4, .. }]
        ));
    }

    #[test]
    fn test_short_block() {
        let mut diagnostics = Diagnostics::new();
        assert!(read_picture(&[0, 0, 0, 3, 0, 0], &ExtractOptions::default(), &mut diagnostics).is_none());
        assert!(matches!(&diagnostics.into_vec()[..], [ParseIssue::OutOfBounds(_)]));
    }

    #[test]
    fn test_linked_and_empty_pictures() {
        let options = ExtractOptions::default();
        let linked = picture_block(3, "-->", b"https://example.com/cover.jpg");
        assert!(read_picture(&linked, &options, &mut Diagnostics::new()).is_none());

        let empty = picture_block(3, "image/png", &[]);
        assert!(read_picture(&empty, &options, &mut Diagnostics::new()).is_none());
    }

    #[test]
    fn test_mime_is_normalised() {
        let data = picture_block(0, "", &[9]);
        let picture = read_picture(&data, &ExtractOptions::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(picture.mime_type(), "image/jpeg");
        assert_eq!(picture.data(), &[9]);
    }
}
