//! Watermark processor for stamping text and overlays onto a canvas.
//!
//! A text stamp runs through four stages: resolve the font, position the
//! text box, sample the background for an ink colour when none was given,
//! then draw. A failure before drawing leaves the canvas untouched.
//!
//! # Example
//!
//! ```
//! use image::RgbaImage;
//! use intervention_image::watermark::{stamp_text, WatermarkConfig};
//!
//! let mut canvas = RgbaImage::new(200, 100);
//! let config = WatermarkConfig::new().with_position("right-bottom");
//! let stamp = stamp_text(&mut canvas, "TEST", &config).unwrap();
//! assert_eq!((stamp.origin.x, stamp.origin.y), (200 - 48, 100));
//! ```

use image::{DynamicImage, RgbaImage};

use super::compositor::WatermarkLayer;
use super::config::WatermarkConfig;
use super::contrast::contrast_color;
use super::position::{
    is_visible, resolve_text_origin, ImageDimensions, PlacementPosition, WatermarkDimensions,
};
use super::text_renderer::{draw_text, pixel_size, resolve_font, text_box, Color};
use crate::codec::decoder::decode_bytes;
use crate::error::ImageError;

/// Overlay used when no watermark image is supplied.
const DEFAULT_OVERLAY_PNG: &[u8] = include_bytes!("assets/default_watermark.png");

/// Outcome of a text stamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStamp {
    /// Baseline origin of the first glyph.
    pub origin: PlacementPosition,
    /// Layout box used for placement and sampling.
    pub bounds: WatermarkDimensions,
    /// Ink the text was drawn with.
    pub color: Color,
    /// Whether `color` came from contrast sampling.
    pub auto_color: bool,
}

/// Outcome of an overlay stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStamp {
    /// Top-left corner of the overlay.
    pub position: PlacementPosition,
    pub dimensions: WatermarkDimensions,
}

fn dimensions_of(canvas: &RgbaImage) -> ImageDimensions {
    ImageDimensions {
        width: canvas.width(),
        height: canvas.height(),
    }
}

/// Stamp `text` onto the canvas.
pub fn stamp_text(
    canvas: &mut RgbaImage,
    text: &str,
    config: &WatermarkConfig,
) -> Result<TextStamp, ImageError> {
    if text.is_empty() {
        return Err(ImageError::invalid_param("text", "watermark text is empty"));
    }
    config.validate()?;

    let font = resolve_font(config.font_bytes.as_deref(), config.font_path.as_deref())?;

    let px_size = pixel_size(config.effective_font_size(), config.effective_font_dpi());
    let bounds = text_box(text, px_size);

    if config.has_unknown_position() {
        tracing::warn!(
            position = config.position.as_deref().unwrap_or_default(),
            "Unrecognized watermark position, using explicit or default placement"
        );
    }
    let anchor = config.anchor();
    let origin = resolve_text_origin(anchor, config.dest, &dimensions_of(canvas), &bounds);

    let (color, auto_color) = match config.explicit_color() {
        Some(color) => (color, false),
        None => (contrast_color(canvas, origin, &bounds), true),
    };

    tracing::debug!(
        chars = text.chars().count(),
        px_size = px_size,
        anchor = ?anchor,
        x = origin.x,
        y = origin.y,
        box_width = bounds.width,
        box_height = bounds.height,
        color = ?color,
        auto_color = auto_color,
        "Stamping text watermark"
    );

    draw_text(canvas, &font, text, origin, px_size, color);

    Ok(TextStamp {
        origin,
        bounds,
        color,
        auto_color,
    })
}

/// Composite an overlay onto the canvas at the configured anchor.
///
/// Only the anchor is consulted; without one the overlay goes to the
/// top-left corner.
pub fn stamp_image(
    canvas: &mut RgbaImage,
    overlay: &RgbaImage,
    config: &WatermarkConfig,
) -> ImageStamp {
    if config.has_unknown_position() {
        tracing::warn!(
            position = config.position.as_deref().unwrap_or_default(),
            "Unrecognized watermark position, placing overlay at origin"
        );
    }

    let layer = WatermarkLayer::anchored(overlay.clone(), config.anchor(), &dimensions_of(canvas));
    let stamp = ImageStamp {
        position: layer.position,
        dimensions: WatermarkDimensions {
            width: overlay.width(),
            height: overlay.height(),
        },
    };

    tracing::debug!(
        x = stamp.position.x,
        y = stamp.position.y,
        width = stamp.dimensions.width,
        height = stamp.dimensions.height,
        "Stamping image watermark"
    );

    if is_visible(&stamp.position, &dimensions_of(canvas), &stamp.dimensions) {
        super::compositor::blend_layer(canvas, &layer);
    } else {
        tracing::debug!("Image watermark falls outside the canvas, skipped");
    }
    stamp
}

/// Decode the embedded default overlay.
pub fn default_overlay() -> Result<DynamicImage, ImageError> {
    decode_bytes(DEFAULT_OVERLAY_PNG)
}
