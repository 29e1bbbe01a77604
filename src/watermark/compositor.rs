//! Watermark compositor for blending overlays onto the canvas.
//!
//! Overlays are drawn with the Porter-Duff "over" operator and clipped to the
//! canvas, so partially off-canvas placements are valid.

use super::position::{
    calculate_image_position, Anchor, ImageDimensions, PlacementPosition, WatermarkDimensions,
};
use image::{Rgba, RgbaImage};

/// A watermark layer to be composited onto an image.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The watermark image (RGBA).
    pub image: RgbaImage,
    /// Top-left corner of the layer on the canvas.
    pub position: PlacementPosition,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .finish()
    }
}

impl WatermarkLayer {
    /// Build a layer placed at a named anchor (or the origin when `None`).
    pub fn anchored(image: RgbaImage, anchor: Option<Anchor>, canvas: &ImageDimensions) -> Self {
        let dims = WatermarkDimensions {
            width: image.width(),
            height: image.height(),
        };
        let position = calculate_image_position(anchor, canvas, &dims);
        Self { image, position }
    }
}

/// Blend a single watermark layer onto the target image.
pub fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    overlay(target, &layer.image, layer.position);
}

/// Draw `image` over `target` with its top-left corner at `position`.
pub fn overlay(target: &mut RgbaImage, image: &RgbaImage, position: PlacementPosition) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let px = position.x as i64;
    let py = position.y as i64;

    // Visible region, clamped to target bounds
    let x_start = px.max(0);
    let y_start = py.max(0);
    let x_end = (px + image.width() as i64).min(target_width);
    let y_end = (py + image.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = image.get_pixel((tx - px) as u32, (ty - py) as u32);
            let target_pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *target_pixel = blend_pixels(*target_pixel, *wm_pixel);
        }
    }
}

/// Blend two pixels with the "over" operator.
///
/// result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
