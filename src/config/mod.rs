// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ImageError;
use crate::watermark::{WatermarkConfig, WatermarkSettings};

pub const DEFAULT_BLANK_WIDTH: u32 = 800;
pub const DEFAULT_BLANK_HEIGHT: u32 = 600;
pub const DEFAULT_JPEG_QUALITY: u8 = 80;
pub const DEFAULT_WEBP_QUALITY: f32 = 80.0;

fn default_save_folder() -> PathBuf {
    PathBuf::from("./")
}

fn default_blank_width() -> u32 {
    DEFAULT_BLANK_WIDTH
}

fn default_blank_height() -> u32 {
    DEFAULT_BLANK_HEIGHT
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_webp_quality() -> f32 {
    DEFAULT_WEBP_QUALITY
}

/// Session configuration loaded from YAML.
///
/// ```yaml
/// file_path: ./photos/cat.jpg
/// save_folder: ${OUTPUT_DIR}/thumbs
/// jpeg_quality: 85
/// watermark:
///   position: right-bottom
///   color: auto
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Source image. When absent a blank canvas is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Folder exports are written to; created if missing.
    #[serde(default = "default_save_folder")]
    pub save_folder: PathBuf,

    #[serde(default = "default_blank_width")]
    pub blank_width: u32,

    #[serde(default = "default_blank_height")]
    pub blank_height: u32,

    /// Quality used by `save` (JPEG)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Quality used by `save_to_stream` (WebP)
    #[serde(default = "default_webp_quality")]
    pub webp_quality: f32,

    /// Default settings for watermarks stamped without explicit options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path: None,
            save_folder: default_save_folder(),
            blank_width: DEFAULT_BLANK_WIDTH,
            blank_height: DEFAULT_BLANK_HEIGHT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            webp_quality: DEFAULT_WEBP_QUALITY,
            watermark: None,
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ImageError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ImageError::Config(e.to_string()))?;

        let mut missing = Vec::new();
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing.first() {
            return Err(ImageError::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        serde_yaml::from_str(&substituted).map_err(|e| ImageError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let yaml = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ImageError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ImageError> {
        if self.blank_width == 0 || self.blank_height == 0 {
            return Err(ImageError::Config(format!(
                "Blank canvas size {}x{} must be non-zero",
                self.blank_width, self.blank_height
            )));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ImageError::Config(format!(
                "jpeg_quality {} must be between 1 and 100",
                self.jpeg_quality
            )));
        }

        if !self.webp_quality.is_finite() || !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(ImageError::Config(format!(
                "webp_quality {} must be between 0 and 100",
                self.webp_quality
            )));
        }

        if self.save_folder.as_os_str().is_empty() {
            return Err(ImageError::Config("save_folder cannot be empty".to_string()));
        }

        if let Some(settings) = &self.watermark {
            settings
                .to_config()
                .map_err(|e| ImageError::Config(format!("Invalid watermark settings: {}", e)))?;
        }

        Ok(())
    }

    /// Watermark defaults as a runtime config, if configured.
    pub fn watermark_config(&self) -> Result<Option<WatermarkConfig>, ImageError> {
        self.watermark
            .as_ref()
            .map(WatermarkSettings::to_config)
            .transpose()
    }
}
