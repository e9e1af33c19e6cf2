/// Image container formats recognised from their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
}

pub const UNKNOWN_MIME: &str = "application/octet-stream";

impl ImageFormat {
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

/// MIME type of a fetched image body, `application/octet-stream` if unknown.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match ImageFormat::detect(bytes) {
        Some(format) => format.mime(),
        None => {
            tracing::warn!(
                "Image service returned {} bytes of an unrecognized format",
                bytes.len()
            );
            UNKNOWN_MIME
        }
    }
}
