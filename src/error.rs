//! Error types for image sessions.
//!
//! Every failure surfaced by the library is an [`ImageError`]. Construction
//! failures (missing source, undecodable bytes, bad font, unwritable output
//! folder) are returned to the caller instead of terminating the process.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur while loading, editing or exporting an image.
#[derive(Error, Debug)]
pub enum ImageError {
    // === Source Errors ===
    /// The source file is missing or unreadable
    #[error("Image source not found: {}: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Image bytes are corrupt or in an unsupported format
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    /// Requested output format is not one of bmp/gif/png/jpeg/webp
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    // === Watermark Errors ===
    /// Font bytes could not be parsed as a TrueType/OpenType font
    #[error("Failed to parse font: {message}")]
    FontParseFailed { message: String },

    // === Output Errors ===
    /// Output folder could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Codec rejected the canvas or options
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },

    /// Quality value outside the codec's accepted range
    #[error("Invalid {format} quality {quality}: must be {range}")]
    InvalidQuality {
        format: String,
        quality: f32,
        range: &'static str,
    },

    /// Writing an encoded file failed
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Processing Errors ===
    /// Resampling failed
    #[error("Resize failed: {message}")]
    ResizeFailed { message: String },

    /// Requested dimensions are invalid
    #[error("Invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Invalid argument to an operation
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImageError {
    /// Short, stable identifier used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageError::SourceNotFound { .. } => "source_not_found",
            ImageError::DecodeFailed { .. } | ImageError::UnsupportedFormat { .. } => {
                "decode_failure"
            }
            ImageError::FontParseFailed { .. } => "font_parse_failure",
            ImageError::DirectoryCreateFailed { .. } => "directory_create_failure",
            ImageError::EncodeFailed { .. } | ImageError::InvalidQuality { .. } => {
                "encode_failure"
            }
            ImageError::Io { .. } => "io",
            ImageError::ResizeFailed { .. } => "resize_failure",
            ImageError::InvalidDimensions { .. } | ImageError::InvalidParameter { .. } => {
                "invalid_argument"
            }
            ImageError::Config(_) => "config",
        }
    }

    /// Helper constructors for common error patterns
    pub fn source_not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImageError::SourceNotFound {
            path: path.into(),
            source,
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn font_parse_failed(message: impl Into<String>) -> Self {
        ImageError::FontParseFailed {
            message: message.into(),
        }
    }

    pub fn directory_create_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImageError::DirectoryCreateFailed {
            path: path.into(),
            source,
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        ImageError::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn invalid_param(param: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}
