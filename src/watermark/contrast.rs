//! Contrast colour selection for text watermarks.
//!
//! The sampled window is baseline-relative: it spans `[x, x + w]`
//! horizontally and `[y - h, y]` vertically, both inclusive and clipped to
//! the canvas. Pixels are alpha-premultiplied before weighting, so fully
//! transparent areas count as black.

use image::RgbaImage;

use super::position::{PlacementPosition, WatermarkDimensions};
use super::text_renderer::Color;

/// Average luma below this value gets white ink; at or above gets black.
pub const CONTRAST_THRESHOLD: f64 = 151.0;

/// Accumulated BT.601 luma over a sampled window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrightnessSample {
    pub total: f64,
    pub count: u64,
}

impl BrightnessSample {
    /// Mean luma, or `None` when nothing was sampled.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

/// ITU-R BT.601 luma of 8-bit channels.
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Premultiply one channel through the 16-bit range, then reduce to 8 bits.
fn premultiplied(channel: u8, alpha: u8) -> u8 {
    let c = channel as u64 * 0x101;
    let a = alpha as u64 * 0x101;
    ((c * a / 0xffff) >> 8) as u8
}

/// Sum the luma of every canvas pixel inside the baseline-relative window.
pub fn sample_brightness(
    canvas: &RgbaImage,
    origin: PlacementPosition,
    dims: &WatermarkDimensions,
) -> BrightnessSample {
    let mut sample = BrightnessSample::default();
    if canvas.width() == 0 || canvas.height() == 0 {
        return sample;
    }

    let max_x = canvas.width() as i64 - 1;
    let max_y = canvas.height() as i64 - 1;

    let x0 = (origin.x as i64).max(0);
    let x1 = (origin.x as i64 + dims.width as i64).min(max_x);
    let y0 = (origin.y as i64 - dims.height as i64).max(0);
    let y1 = (origin.y as i64).min(max_y);

    if x0 > x1 || y0 > y1 {
        return sample;
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            let px = canvas.get_pixel(x as u32, y as u32);
            let a = px[3];
            sample.total += luma(
                premultiplied(px[0], a),
                premultiplied(px[1], a),
                premultiplied(px[2], a),
            );
            sample.count += 1;
        }
    }

    sample
}

/// Pick legible ink for a background of the given average luma.
///
/// An empty sample yields black.
pub fn contrast_color_for(average: Option<f64>) -> Color {
    match average {
        Some(avg) if avg < CONTRAST_THRESHOLD => Color::white(),
        _ => Color::black(),
    }
}

/// Sample the window under a text box and return black or white ink.
pub fn contrast_color(
    canvas: &RgbaImage,
    origin: PlacementPosition,
    dims: &WatermarkDimensions,
) -> Color {
    contrast_color_for(sample_brightness(canvas, origin, dims).average())
}
