//! Source decoding
//!
//! Sources are identified by content sniffing, not by file extension.

use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;

use crate::error::ImageError;

/// Decode encoded bytes into a DynamicImage
pub fn decode_bytes(data: &[u8]) -> Result<DynamicImage, ImageError> {
    if data.is_empty() {
        return Err(ImageError::decode_failed("empty input"));
    }

    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Read a source file from disk
pub fn read_source(path: &Path) -> Result<Vec<u8>, ImageError> {
    std::fs::read(path).map_err(|e| ImageError::source_not_found(path, e))
}

/// Read and decode an image file
pub fn open(path: &Path) -> Result<DynamicImage, ImageError> {
    let data = read_source(path)?;
    let img = decode_bytes(&data)?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Decoded image source"
    );
    Ok(img)
}
