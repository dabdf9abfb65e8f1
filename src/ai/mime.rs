use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Image encodings accepted for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    pub const ALLOWED: [ImageMime; 2] = [ImageMime::Jpeg, ImageMime::Png];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
        }
    }

    /// Match a declared `Content-Type` against the allow-list.
    ///
    /// Parameters such as `; charset=...` are ignored; the comparison is
    /// case-insensitive.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        Self::ALLOWED
            .into_iter()
            .find(|mime| mime.as_str().eq_ignore_ascii_case(essence))
    }

    /// Sniff the encoding from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageMime::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageMime::Png),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            _ => None,
        }
    }

    /// Resolve the type of an image file: magic bytes first, then extension.
    pub fn for_file(path: &Path, bytes: &[u8]) -> Result<Self> {
        let by_extension = Self::from_extension(path).ok_or_else(|| {
            Error::InvalidImage(format!(
                "{} is not a jpg, jpeg or png file",
                path.display()
            ))
        })?;

        match Self::detect(bytes) {
            Some(detected) => Ok(detected),
            None => {
                tracing::warn!(
                    "Unrecognized image header (first 4 bytes: {:02X?}), using extension of {}",
                    &bytes[..bytes.len().min(4)],
                    path.display()
                );
                Ok(by_extension)
            }
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
