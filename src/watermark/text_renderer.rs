//! Text watermark rendering.
//!
//! Glyphs are rasterized with `ab_glyph` and blended straight onto the
//! canvas at a baseline origin. Font sizes are given in points and converted
//! to pixels with the configured DPI (`px = size * dpi / 72`).

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::OnceLock;

use super::compositor::blend_pixels;
use super::position::{PlacementPosition, WatermarkDimensions};
use crate::error::ImageError;

/// Embedded fallback font (DejaVu Sans Mono).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

static DEFAULT_FONT: OnceLock<Option<FontArc>> = OnceLock::new();

/// Get the embedded font, parsing it once.
pub fn default_font() -> Result<FontArc, ImageError> {
    DEFAULT_FONT
        .get_or_init(|| FontArc::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .clone()
        .ok_or_else(|| ImageError::font_parse_failed("embedded font is invalid"))
}

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// The all-zero colour, which requests automatic contrast.
    pub fn is_zero(&self) -> bool {
        *self == Color::default()
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Parse a hex color string.
///
/// Supports `#RGB`, `#RRGGBB` and `#RRGGBBAA`. Colours without an alpha
/// component are opaque.
///
/// # Examples
///
/// ```
/// use intervention_image::watermark::text_renderer::{parse_hex_color, Color};
///
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::white());
/// assert_eq!(parse_hex_color("#FF000080").unwrap(), Color::new(255, 0, 0, 128));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, ImageError> {
    let digits = hex
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| ImageError::invalid_param("color", "must start with '#'"))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ImageError::invalid_param(
            "color",
            format!("invalid hex digits in {}", hex),
        ));
    }

    let byte = |range: std::ops::Range<usize>| -> Result<u8, ImageError> {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| ImageError::invalid_param("color", format!("invalid hex color {}", hex)))
    };

    match digits.len() {
        // Double each digit: 0xF -> 0xFF
        3 => Ok(Color::rgb(
            byte(0..1)? * 17,
            byte(1..2)? * 17,
            byte(2..3)? * 17,
        )),
        6 => Ok(Color::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => Ok(Color::new(
            byte(0..2)?,
            byte(2..4)?,
            byte(4..6)?,
            byte(6..8)?,
        )),
        n => Err(ImageError::invalid_param(
            "color",
            format!("must be #RGB, #RRGGBB or #RRGGBBAA, got {} digits", n),
        )),
    }
}

/// Parse TrueType/OpenType font bytes.
pub fn parse_font(bytes: Vec<u8>) -> Result<FontArc, ImageError> {
    FontArc::try_from_vec(bytes).map_err(|e| ImageError::font_parse_failed(e.to_string()))
}

/// Resolve the font for a watermark.
///
/// Inline bytes win over a font file, which wins over the embedded font.
pub fn resolve_font(bytes: Option<&[u8]>, path: Option<&Path>) -> Result<FontArc, ImageError> {
    if let Some(bytes) = bytes.filter(|b| !b.is_empty()) {
        return parse_font(bytes.to_vec());
    }

    if let Some(path) = path {
        let data = std::fs::read(path).map_err(|e| ImageError::source_not_found(path, e))?;
        return parse_font(data);
    }

    default_font()
}

/// Pixel size of one em for a point size at the given DPI.
pub fn pixel_size(font_size: f32, dpi: f32) -> f32 {
    font_size * dpi / 72.0
}

/// Layout box of a text watermark: one em per character by one em high.
pub fn text_box(text: &str, px_size: f32) -> WatermarkDimensions {
    let em = px_size.max(0.0) as u32;
    WatermarkDimensions {
        width: em.saturating_mul(text.chars().count() as u32),
        height: em,
    }
}

/// Draw `text` onto the canvas with its baseline starting at `origin`.
///
/// Pixels outside the canvas are clipped.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    origin: PlacementPosition,
    px_size: f32,
    color: Color,
) {
    // PxScale is relative to the font's ascent-descent height, not the em
    let scale = match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(px_size * font.height_unscaled() / upem),
        _ => PxScale::from(px_size),
    };
    let scaled_font = font.as_scaled(scale);

    let canvas_width = canvas.width() as i32;
    let canvas_height = canvas.height() as i32;
    let alpha = color.a as f32;

    let mut cursor_x = origin.x as f32;
    let baseline_y = origin.y as f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width && y < canvas_height {
                    let pixel_alpha = (coverage.clamp(0.0, 1.0) * alpha).round() as u8;
                    if pixel_alpha == 0 {
                        return;
                    }
                    let ink = Rgba([color.r, color.g, color.b, pixel_alpha]);
                    let existing = canvas.get_pixel_mut(x as u32, y as u32);
                    *existing = blend_pixels(*existing, ink);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}
