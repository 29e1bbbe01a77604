//! Decoding, resampling and encoding of canvases
//!
//! - `decoder`: content-sniffed decoding of files and byte buffers
//! - `resize`: exact-size Lanczos3 resampling
//! - `encoder`: BMP, GIF, PNG, JPEG and WebP encoders behind one trait
//! - `format`: output format identifiers

pub mod decoder;
pub mod encoder;
pub mod format;
pub mod resize;

pub use decoder::{decode_bytes, open};
pub use encoder::{EncodedImage, EncoderFactory, EncoderQuality, ImageEncoder};
pub use format::{detect_format, OutputFormat};
pub use resize::resize_image;
