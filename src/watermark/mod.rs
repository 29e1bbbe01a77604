//! Watermark module for stamping text and image watermarks onto a canvas.
//!
//! # Features
//!
//! - **Text watermarks** rendered from TrueType fonts (embedded, file or inline bytes)
//! - **Image watermarks** from files, memory or the embedded default overlay
//! - **5 named anchors**: `LEFT TOP`, `LEFT BOTTOM`, `RIGHT TOP`, `RIGHT BOTTOM`,
//!   `CENTER CENTER`, matched case-insensitively with whitespace collapsed
//! - **Automatic contrast**: black or white ink picked from the background luma
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   font_size: 18
//!   font_dpi: 72
//!   position: right-bottom
//!   color: auto
//! ```

pub mod compositor;
pub mod config;
pub mod contrast;
pub mod position;
pub mod processor;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{blend_layer, overlay, WatermarkLayer};
pub use config::{parse_color_setting, WatermarkConfig, WatermarkSettings};
pub use contrast::{contrast_color, sample_brightness, BrightnessSample, CONTRAST_THRESHOLD};
pub use position::{
    calculate_image_position, calculate_text_position, is_visible, normalize_position,
    resolve_text_origin, Anchor, ImageDimensions, PlacementPosition, WatermarkDimensions,
};
pub use processor::{default_overlay, stamp_image, stamp_text, ImageStamp, TextStamp};
pub use text_renderer::{parse_hex_color, Color};
