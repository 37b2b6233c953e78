// Embedded cover art shared by the ID3v2 and FLAC readers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Picture types shared by ID3v2 APIC frames and FLAC PICTURE blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureType {
    Other = 0,
    FileIcon = 1,
    OtherFileIcon = 2,
    CoverFront = 3,
    CoverBack = 4,
    LeafletPage = 5,
    Media = 6,
    LeadArtist = 7,
    Artist = 8,
    Conductor = 9,
    Band = 10,
    Composer = 11,
    Lyricist = 12,
    RecordingLocation = 13,
    DuringRecording = 14,
    DuringPerformance = 15,
    VideoScreenCapture = 16,
    BrightColouredFish = 17,
    Illustration = 18,
    BandLogo = 19,
    PublisherLogo = 20,
}

impl PictureType {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => PictureType::FileIcon,
            2 => PictureType::OtherFileIcon,
            3 => PictureType::CoverFront,
            4 => PictureType::CoverBack,
            5 => PictureType::LeafletPage,
            6 => PictureType::Media,
            7 => PictureType::LeadArtist,
            8 => PictureType::Artist,
            9 => PictureType::Conductor,
            10 => PictureType::Band,
            11 => PictureType::Composer,
            12 => PictureType::Lyricist,
            13 => PictureType::RecordingLocation,
            14 => PictureType::DuringRecording,
            15 => PictureType::DuringPerformance,
            16 => PictureType::VideoScreenCapture,
            17 => PictureType::BrightColouredFish,
            18 => PictureType::Illustration,
            19 => PictureType::BandLogo,
            20 => PictureType::PublisherLogo,
            _ => PictureType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PictureType::Other => "Other",
            PictureType::FileIcon => "File Icon",
            PictureType::OtherFileIcon => "Other File Icon",
            PictureType::CoverFront => "Cover (front)",
            PictureType::CoverBack => "Cover (back)",
            PictureType::LeafletPage => "Leaflet page",
            PictureType::Media => "Media",
            PictureType::LeadArtist => "Lead artist",
            PictureType::Artist => "Artist",
            PictureType::Conductor => "Conductor",
            PictureType::Band => "Band",
            PictureType::Composer => "Composer",
            PictureType::Lyricist => "Lyricist",
            PictureType::RecordingLocation => "Recording Location",
            PictureType::DuringRecording => "During recording",
            PictureType::DuringPerformance => "During performance",
            PictureType::VideoScreenCapture => "Video screen capture",
            PictureType::BrightColouredFish => "Bright coloured fish",
            PictureType::Illustration => "Illustration",
            PictureType::BandLogo => "Band logo",
            PictureType::PublisherLogo => "Publisher logo",
        }
    }
}

/// An embedded image. Pixel data is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    mime_type: String,
    picture_type: PictureType,
    data: Vec<u8>,
}

impl Picture {
    pub(crate) fn new(mime_type: String, picture_type: PictureType, data: Vec<u8>) -> Self {
        Picture {
            mime_type,
            picture_type,
            data,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn picture_type(&self) -> PictureType {
        self.picture_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get file extension based on MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "jpg",
        }
    }
}

impl Serialize for Picture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Picture", 4)?;
        state.serialize_field("mime_type", &self.mime_type)?;
        state.serialize_field("picture_type", &self.picture_type)?;
        state.serialize_field("size", &self.data.len())?;
        state.serialize_field("data", &STANDARD.encode(&self.data))?;
        state.end()
    }
}

/// Normalise a declared MIME type.
///
/// Empty or malformed values fall back to `image/jpeg`; the bare `PNG`/`JPG`
/// format codes some older writers put in APIC frames are expanded.
pub fn normalize_mime(raw: &str) -> String {
    let mime = raw.trim();
    if mime.eq_ignore_ascii_case("png") {
        return "image/png".to_string();
    }
    let valid = mime
        .split_once('/')
        .map(|(kind, sub)| !kind.is_empty() && !sub.is_empty())
        .unwrap_or(false)
        && mime.chars().all(|c| c.is_ascii_graphic());
    if valid {
        mime.to_ascii_lowercase()
    } else {
        "image/jpeg".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("image/png"), "image/png");
        assert_eq!(normalize_mime("Image/JPEG"), "image/jpeg");
        assert_eq!(normalize_mime(""), "image/jpeg");
        assert_eq!(normalize_mime("JPG"), "image/jpeg");
        assert_eq!(normalize_mime("PNG"), "image/png");
        assert_eq!(normalize_mime("image/"), "image/jpeg");
        assert_eq!(normalize_mime("im age/png"), "image/jpeg");
    }

    #[test]
    fn test_picture_type_codes() {
        assert_eq!(PictureType::from_u32(3), PictureType::CoverFront);
        assert_eq!(PictureType::from_u32(200), PictureType::Other);
        assert_eq!(PictureType::CoverFront.as_str(), "Cover (front)");
    }

    #[test]
    fn test_serializes_data_as_base64() {
        let picture = Picture::new("image/png".into(), PictureType::CoverFront, vec![1, 2, 3]);
        let value = serde_json::to_value(&picture).unwrap();
        assert_eq!(value["mime_type"], "image/png");
        assert_eq!(value["picture_type"], "cover_front");
        assert_eq!(value["size"], 3);
        assert_eq!(value["data"], "AQID");
        assert_eq!(picture.extension(), "png");
    }
}
