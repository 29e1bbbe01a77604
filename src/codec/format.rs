//! Output format identification

use std::fmt;
use std::str::FromStr;

use crate::error::ImageError;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Bmp,
    Gif,
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Bmp,
        OutputFormat::Gif,
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::WebP,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// File extension appended to export names
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "bmp" => Ok(OutputFormat::Bmp),
            "gif" => Ok(OutputFormat::Gif),
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(ImageError::unsupported_format(s)),
        }
    }
}

/// Detect the container format of encoded bytes, if it is one we can export
pub fn detect_format(data: &[u8]) -> Option<OutputFormat> {
    match image::guess_format(data).ok()? {
        image::ImageFormat::Bmp => Some(OutputFormat::Bmp),
        image::ImageFormat::Gif => Some(OutputFormat::Gif),
        image::ImageFormat::Png => Some(OutputFormat::Png),
        image::ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
        image::ImageFormat::WebP => Some(OutputFormat::WebP),
        _ => None,
    }
}
