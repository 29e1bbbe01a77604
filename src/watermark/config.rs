//! Watermark configuration types.
//!
//! [`WatermarkConfig`] is the runtime form used by the stamping functions.
//! [`WatermarkSettings`] is its serializable counterpart for YAML files, with
//! inline fonts carried as base64 and colours as hex strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::position::Anchor;
use super::text_renderer::{parse_hex_color, pixel_size, Color};
use crate::error::ImageError;

pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_FONT_DPI: f32 = 72.0;

/// Largest em size in pixels a text watermark may render at.
pub const MAX_PIXEL_SIZE: f32 = 4096.0;

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_font_dpi() -> f32 {
    DEFAULT_FONT_DPI
}

/// Options for one text or image watermark.
///
/// All fields are optional in spirit: a default config stamps 12pt text at
/// 72 DPI with the embedded font at the bottom-left corner in an automatic
/// contrast colour.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// TrueType font file.
    pub font_path: Option<PathBuf>,
    /// Inline font bytes; take precedence over `font_path`.
    pub font_bytes: Option<Vec<u8>>,
    /// Size in points. Non-positive values fall back to 12.
    pub font_size: f32,
    /// Resolution used to convert points to pixels. Non-positive values fall back to 72.
    pub font_dpi: f32,
    /// Explicit baseline origin for text, used only when both are positive.
    pub dest: Option<(i32, i32)>,
    /// Named anchor, matched after normalization.
    pub position: Option<String>,
    /// Ink colour. `None` or the all-zero colour selects contrast automatically.
    pub color: Option<Color>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_bytes: None,
            font_size: DEFAULT_FONT_SIZE,
            font_dpi: DEFAULT_FONT_DPI,
            dest: None,
            position: None,
            color: None,
        }
    }
}

impl WatermarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_font_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.font_bytes = Some(bytes.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_dpi(mut self, dpi: f32) -> Self {
        self.font_dpi = dpi;
        self
    }

    pub fn with_dest(mut self, x: i32, y: i32) -> Self {
        self.dest = Some((x, y));
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Parsed anchor; `None` when unset, blank or unrecognized.
    pub fn anchor(&self) -> Option<Anchor> {
        self.position.as_deref().and_then(Anchor::parse)
    }

    /// True when a non-blank position string was given but matches no anchor.
    pub fn has_unknown_position(&self) -> bool {
        matches!(self.position.as_deref(), Some(p) if !p.trim().is_empty() && Anchor::parse(p).is_none())
    }

    pub fn effective_font_size(&self) -> f32 {
        if self.font_size.is_finite() && self.font_size > 0.0 {
            self.font_size
        } else {
            DEFAULT_FONT_SIZE
        }
    }

    pub fn effective_font_dpi(&self) -> f32 {
        if self.font_dpi.is_finite() && self.font_dpi > 0.0 {
            self.font_dpi
        } else {
            DEFAULT_FONT_DPI
        }
    }

    /// Explicit ink colour, or `None` when contrast should be sampled.
    pub fn explicit_color(&self) -> Option<Color> {
        self.color.filter(|c| !c.is_zero())
    }

    pub fn validate(&self) -> Result<(), ImageError> {
        if self.font_size.is_nan() || self.font_size.is_infinite() {
            return Err(ImageError::invalid_param(
                "font_size",
                "must be a finite number",
            ));
        }
        if self.font_dpi.is_nan() || self.font_dpi.is_infinite() {
            return Err(ImageError::invalid_param("font_dpi", "must be a finite number"));
        }

        let px = pixel_size(self.effective_font_size(), self.effective_font_dpi());
        if !px.is_finite() || px > MAX_PIXEL_SIZE {
            return Err(ImageError::invalid_param(
                "font_size",
                format!(
                    "{}pt at {} DPI is {} px, above the {} px limit",
                    self.font_size, self.font_dpi, px, MAX_PIXEL_SIZE
                ),
            ));
        }
        Ok(())
    }
}

/// Serializable watermark settings.
///
/// ```yaml
/// watermark:
///   font_path: /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
///   font_size: 18
///   position: right-bottom
///   color: auto
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    #[serde(default)]
    pub font_path: Option<String>,

    /// Font file contents, base64 encoded
    #[serde(default)]
    pub font_base64: Option<String>,

    #[serde(default = "default_font_size")]
    pub font_size: f32,

    #[serde(default = "default_font_dpi")]
    pub font_dpi: f32,

    #[serde(default)]
    pub dest_x: i32,

    #[serde(default)]
    pub dest_y: i32,

    #[serde(default)]
    pub position: Option<String>,

    /// `#RGB`, `#RRGGBB`, `#RRGGBBAA` or `auto`
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            font_path: None,
            font_base64: None,
            font_size: DEFAULT_FONT_SIZE,
            font_dpi: DEFAULT_FONT_DPI,
            dest_x: 0,
            dest_y: 0,
            position: None,
            color: None,
        }
    }
}

/// Parse a colour setting; `auto` and blank mean automatic contrast.
pub fn parse_color_setting(value: &str) -> Result<Option<Color>, ImageError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    parse_hex_color(value).map(Some)
}

impl WatermarkSettings {
    /// Convert into a runtime config, decoding inline font and colour.
    pub fn to_config(&self) -> Result<WatermarkConfig, ImageError> {
        let font_bytes = match self.font_base64.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => Some(STANDARD.decode(encoded).map_err(|e| {
                ImageError::invalid_param("font_base64", format!("invalid base64: {}", e))
            })?),
            _ => None,
        };

        let color = match self.color.as_deref() {
            Some(value) => parse_color_setting(value)?,
            None => None,
        };

        let dest = if self.dest_x != 0 || self.dest_y != 0 {
            Some((self.dest_x, self.dest_y))
        } else {
            None
        };

        let config = WatermarkConfig {
            font_path: self
                .font_path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            font_bytes,
            font_size: self.font_size,
            font_dpi: self.font_dpi,
            dest,
            position: self.position.clone().filter(|p| !p.trim().is_empty()),
            color,
        };
        config.validate()?;
        Ok(config)
    }
}
