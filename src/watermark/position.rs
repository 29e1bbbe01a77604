//! Position calculation for watermark placement.
//!
//! Five named anchors are supported. Image overlays are placed by their
//! top-left corner; text is placed by its baseline origin, so the y
//! coordinate of a text anchor sits one box-height below the top of the box.
//!
//! # Example
//!
//! ```
//! use intervention_image::watermark::position::{
//!     calculate_image_position, Anchor, ImageDimensions, WatermarkDimensions,
//! };
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = calculate_image_position(Some(Anchor::RightBottom), &image, &watermark);
//! assert_eq!((pos.x, pos.y), (700, 550));
//! ```

use std::fmt;

/// Named placement anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    CenterCenter,
}

impl Anchor {
    /// Parse an anchor name after normalization.
    ///
    /// Returns `None` for empty or unrecognized names.
    pub fn parse(input: &str) -> Option<Self> {
        match normalize_position(input).as_str() {
            "LEFT TOP" => Some(Anchor::LeftTop),
            "LEFT BOTTOM" => Some(Anchor::LeftBottom),
            "RIGHT TOP" => Some(Anchor::RightTop),
            "RIGHT BOTTOM" => Some(Anchor::RightBottom),
            "CENTER CENTER" => Some(Anchor::CenterCenter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::LeftTop => "LEFT TOP",
            Anchor::LeftBottom => "LEFT BOTTOM",
            Anchor::RightTop => "RIGHT TOP",
            Anchor::RightBottom => "RIGHT BOTTOM",
            Anchor::CenterCenter => "CENTER CENTER",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a position string for matching.
///
/// Trims, treats `-` and `_` as spaces, collapses runs of whitespace to a
/// single space, upper-cases, and maps the legacy `BUTTOM` spelling to
/// `BOTTOM`.
pub fn normalize_position(input: &str) -> String {
    let spaced: String = input
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();

    spaced
        .split_whitespace()
        .map(|word| {
            let upper = word.to_uppercase();
            if upper == "BUTTOM" {
                "BOTTOM".to_string()
            } else {
                upper
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// A single position where a watermark should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build from wide coordinates, saturating at the `i32` range.
    pub fn clamped(x: i64, y: i64) -> Self {
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        Self::new(clamp(x), clamp(y))
    }
}

/// Calculate the top-left corner for an image overlay.
///
/// Without an anchor the overlay goes to (0, 0). Coordinates may be negative
/// when the overlay is larger than the image.
pub fn calculate_image_position(
    anchor: Option<Anchor>,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> PlacementPosition {
    let img_w = image.width as i64;
    let img_h = image.height as i64;
    let wm_w = watermark.width as i64;
    let wm_h = watermark.height as i64;

    let (x, y) = match anchor {
        Some(Anchor::LeftTop) | None => (0, 0),
        Some(Anchor::LeftBottom) => (0, img_h - wm_h),
        Some(Anchor::RightTop) => (img_w - wm_w, 0),
        Some(Anchor::RightBottom) => (img_w - wm_w, img_h - wm_h),
        Some(Anchor::CenterCenter) => ((img_w - wm_w) / 2, (img_h - wm_h) / 2),
    };
    PlacementPosition::clamped(x, y)
}

/// Calculate the baseline origin for a text box at a named anchor.
pub fn calculate_text_position(
    anchor: Anchor,
    image: &ImageDimensions,
    text: &WatermarkDimensions,
) -> PlacementPosition {
    let img_w = image.width as i64;
    let img_h = image.height as i64;
    let box_w = text.width as i64;
    let box_h = text.height as i64;

    let (x, y) = match anchor {
        Anchor::LeftTop => (0, box_h),
        Anchor::LeftBottom => (0, img_h),
        Anchor::RightTop => (img_w - box_w, box_h),
        Anchor::RightBottom => (img_w - box_w, img_h),
        Anchor::CenterCenter => (((img_w - box_w) / 2).max(0), (img_h - box_h) / 2 + box_h),
    };
    PlacementPosition::clamped(x, y)
}

/// Resolve the text origin from an anchor, explicit coordinates or the default.
///
/// An anchor always wins. Explicit coordinates are honoured only when both
/// are strictly positive. Otherwise the baseline sits at the bottom-left
/// corner of the image.
pub fn resolve_text_origin(
    anchor: Option<Anchor>,
    explicit: Option<(i32, i32)>,
    image: &ImageDimensions,
    text: &WatermarkDimensions,
) -> PlacementPosition {
    if let Some(anchor) = anchor {
        return calculate_text_position(anchor, image, text);
    }

    match explicit {
        Some((x, y)) if x > 0 && y > 0 => PlacementPosition::new(x, y),
        _ => PlacementPosition::clamped(0, image.height as i64),
    }
}

/// Check if a position is at least partially visible within the image.
pub fn is_visible(
    pos: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    let x = pos.x as i64;
    let y = pos.y as i64;
    let wm_right = x + watermark.width as i64;
    let wm_bottom = y + watermark.height as i64;

    x < image.width as i64 && y < image.height as i64 && wm_right > 0 && wm_bottom > 0
}
