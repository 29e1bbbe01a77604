//! Image session: owns one canvas and exposes every edit and export operation.
//!
//! A session is created from exactly one source (pixel buffer, decoded image,
//! file, encoded bytes) or as a blank transparent canvas. Operations mutate
//! the canvas in place and accumulate; exports read it without changing it.
//!
//! # Example
//!
//! ```no_run
//! use intervention_image::{InterventionImage, WatermarkConfig};
//!
//! # fn main() -> intervention_image::Result<()> {
//! let mut img = InterventionImage::open("photos/cat.jpg")?.with_save_folder("out")?;
//! img.resize(300, 600)?;
//! img.add_text_watermark("(c) 2024", Some(&WatermarkConfig::new().with_position("right bottom")))?;
//! let path = img.save_to_png("")?; // out/cat.png
//! # Ok(())
//! # }
//! ```

use image::{DynamicImage, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use crate::captcha::{captcha_font_size, paint_background, random_code};
use crate::codec::decoder::{decode_bytes, open as open_source};
use crate::codec::encoder::{EncodedImage, EncoderFactory, EncoderQuality};
use crate::codec::format::OutputFormat;
use crate::codec::resize::resize_image;
use crate::config::{
    Config, DEFAULT_BLANK_HEIGHT, DEFAULT_BLANK_WIDTH, DEFAULT_JPEG_QUALITY, DEFAULT_WEBP_QUALITY,
};
use crate::error::{ImageError, Result};
use crate::watermark::processor::{default_overlay, stamp_image, stamp_text, ImageStamp, TextStamp};
use crate::watermark::text_renderer::{resolve_font, Color};
use crate::watermark::{Anchor, WatermarkConfig};

/// Sources and output folder for [`InterventionImage::new`].
///
/// When several sources are set the first one in field order wins:
/// `buffer`, then `image`, then `file_path`. With none, a blank
/// transparent 800x600 canvas is created.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Ready-made RGBA pixel buffer.
    pub buffer: Option<RgbaImage>,
    /// Decoded image in any pixel format.
    pub image: Option<DynamicImage>,
    /// Image file on disk.
    pub file_path: Option<PathBuf>,
    /// Export folder, created recursively. Defaults to `./`.
    pub save_folder: Option<PathBuf>,
}

/// An editable image.
#[derive(Debug, Clone)]
pub struct InterventionImage {
    canvas: RgbaImage,
    source_path: Option<PathBuf>,
    save_folder: PathBuf,
    configured: bool,
    watermark_defaults: WatermarkConfig,
    jpeg_quality: u8,
    webp_quality: f32,
}

impl InterventionImage {
    fn with_canvas(canvas: RgbaImage, configured: bool) -> Self {
        Self {
            canvas,
            source_path: None,
            save_folder: PathBuf::from("./"),
            configured,
            watermark_defaults: WatermarkConfig::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }

    /// Create a session from explicit options.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let SessionOptions {
            buffer,
            image,
            file_path,
            save_folder,
        } = options;

        let mut session = if let Some(buffer) = buffer {
            Self::from_buffer(buffer)
        } else if let Some(image) = image {
            Self::from_image(image)
        } else if let Some(path) = file_path {
            Self::open(path)?
        } else {
            Self::blank()?
        };

        if let Some(folder) = save_folder {
            session = session.with_save_folder(folder)?;
        }

        Ok(session)
    }

    /// Blank, fully transparent 800x600 canvas.
    pub fn blank() -> Result<Self> {
        Self::blank_with_size(DEFAULT_BLANK_WIDTH, DEFAULT_BLANK_HEIGHT)
    }

    /// Blank, fully transparent canvas of the given size.
    pub fn blank_with_size(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::invalid_dimensions(
                width,
                height,
                "blank canvas must be non-empty",
            ));
        }
        tracing::debug!(width = width, height = height, "Created blank canvas");
        Ok(Self::with_canvas(RgbaImage::new(width, height), false))
    }

    /// Read and decode an image file. The format is sniffed from content.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = open_source(path)?;

        let mut session = Self::with_canvas(image.into_rgba8(), true);
        session.source_path = Some(path.to_path_buf());
        Ok(session)
    }

    /// Decode an image held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = decode_bytes(data)?;
        Ok(Self::with_canvas(image.into_rgba8(), true))
    }

    /// Take ownership of a decoded image, normalizing it to RGBA8.
    pub fn from_image(image: DynamicImage) -> Self {
        Self::with_canvas(image.into_rgba8(), true)
    }

    /// Take ownership of an RGBA pixel buffer as-is.
    pub fn from_buffer(buffer: RgbaImage) -> Self {
        Self::with_canvas(buffer, true)
    }

    /// Build a session from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let session = match &config.file_path {
            Some(path) => Self::open(path)?,
            None => Self::blank_with_size(config.blank_width, config.blank_height)?,
        };

        let mut session = session.with_save_folder(&config.save_folder)?;
        session.jpeg_quality = config.jpeg_quality;
        session.webp_quality = config.webp_quality;
        if let Some(defaults) = config.watermark_config()? {
            session.watermark_defaults = defaults;
        }
        Ok(session)
    }

    /// Set the export folder, creating it recursively.
    pub fn with_save_folder(mut self, folder: impl Into<PathBuf>) -> Result<Self> {
        let folder = folder.into();
        ensure_dir(&folder)?;
        self.save_folder = folder;
        Ok(self)
    }

    /// Set default watermark options after checking their font resolves.
    pub fn set_watermark(&mut self, config: WatermarkConfig) -> Result<()> {
        config.validate()?;
        resolve_font(config.font_bytes.as_deref(), config.font_path.as_deref())?;
        self.watermark_defaults = config;
        Ok(())
    }

    pub fn watermark_defaults(&self) -> &WatermarkConfig {
        &self.watermark_defaults
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn save_folder(&self) -> &Path {
        &self.save_folder
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Whether the session was built from an image source rather than blank.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Resample the canvas to exactly `width` x `height`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (old_w, old_h) = self.canvas.dimensions();
        self.canvas = resize_image(&self.canvas, width, height)?;
        tracing::debug!(
            from_width = old_w,
            from_height = old_h,
            to_width = width,
            to_height = height,
            "Resized canvas"
        );
        Ok(())
    }

    /// Stamp text using `config`, or the session defaults when `None`.
    pub fn add_text_watermark(
        &mut self,
        text: &str,
        config: Option<&WatermarkConfig>,
    ) -> Result<TextStamp> {
        let config = config.unwrap_or(&self.watermark_defaults);
        stamp_text(&mut self.canvas, text, config).map_err(|e| {
            tracing::warn!(error = %e, kind = e.kind(), "Text watermark failed");
            e
        })
    }

    /// Composite an overlay file, or the built-in overlay when `path` is `None`.
    pub fn add_image_watermark(
        &mut self,
        path: Option<&Path>,
        config: Option<&WatermarkConfig>,
    ) -> Result<ImageStamp> {
        let overlay = match path {
            Some(path) => open_source(path)?,
            None => default_overlay()?,
        };
        Ok(self.add_image_watermark_from(&overlay, config))
    }

    /// Composite an already decoded overlay.
    pub fn add_image_watermark_from(
        &mut self,
        overlay: &DynamicImage,
        config: Option<&WatermarkConfig>,
    ) -> ImageStamp {
        let config = config.unwrap_or(&self.watermark_defaults);
        stamp_image(&mut self.canvas, &overlay.to_rgba8(), config)
    }

    /// Generate a captcha with an entropy-seeded generator.
    pub fn generate_captcha(&mut self, count: usize, width: u32, height: u32) -> Result<String> {
        self.generate_captcha_with_rng(&mut StdRng::from_entropy(), count, width, height)
    }

    /// Generate a reproducible captcha from `seed`.
    pub fn generate_captcha_with_seed(
        &mut self,
        seed: u64,
        count: usize,
        width: u32,
        height: u32,
    ) -> Result<String> {
        self.generate_captcha_with_rng(&mut StdRng::seed_from_u64(seed), count, width, height)
    }

    /// Generate a captcha and stamp its code onto the canvas.
    ///
    /// A blank session gets a freshly painted background of `width` x
    /// `height`; a session built from an image is resized to that size
    /// instead. The code is drawn in white, centered.
    ///
    /// The resize happens when either dimension differs from the target,
    /// not only when both do, so the canvas always ends up `width` x `height`.
    pub fn generate_captcha_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        width: u32,
        height: u32,
    ) -> Result<String> {
        if count == 0 {
            return Err(ImageError::invalid_param(
                "count",
                "captcha needs at least one character",
            ));
        }
        if width == 0 || height == 0 {
            return Err(ImageError::invalid_dimensions(
                width,
                height,
                "captcha canvas must be non-empty",
            ));
        }

        if !self.configured {
            self.canvas = paint_background(rng, width, height);
        } else if self.canvas.dimensions() != (width, height) {
            self.resize(width, height)?;
        }

        let code = random_code(rng, count);
        let mut config = WatermarkConfig::new()
            .with_font_size(captcha_font_size(width, count))
            .with_position(Anchor::CenterCenter.as_str())
            .with_color(Color::white());
        config.font_path = self.watermark_defaults.font_path.clone();
        config.font_bytes = self.watermark_defaults.font_bytes.clone();

        stamp_text(&mut self.canvas, &code, &config)?;
        tracing::debug!(chars = count, width = width, height = height, "Generated captcha");
        Ok(code)
    }

    /// Encode the canvas without writing it anywhere.
    pub fn encode(&self, format: OutputFormat, quality: EncoderQuality) -> Result<EncodedImage> {
        let (width, height) = self.canvas.dimensions();
        EncoderFactory::create(format).encode(self.canvas.as_raw(), width, height, quality)
    }

    /// Build `<save_folder>/<name>.<ext>`.
    ///
    /// Any extension on `filename` is replaced. An empty `filename` uses the
    /// source file's stem.
    pub fn output_path(&self, filename: &str, format: OutputFormat) -> Result<PathBuf> {
        let base = if filename.trim().is_empty() {
            self.source_path
                .as_deref()
                .and_then(Path::file_stem)
                .map(PathBuf::from)
                .ok_or_else(|| {
                    ImageError::invalid_param(
                        "filename",
                        "empty filename and no source file to derive it from",
                    )
                })?
        } else {
            let path = Path::new(filename);
            if path.extension().is_some() {
                path.with_extension("")
            } else {
                path.to_path_buf()
            }
        };

        let mut name = base.into_os_string();
        name.push(".");
        name.push(format.extension());
        Ok(self.save_folder.join(name))
    }

    /// Encode and write the canvas, returning the written path.
    pub fn save_as(
        &self,
        filename: &str,
        format: OutputFormat,
        quality: EncoderQuality,
    ) -> Result<PathBuf> {
        let path = self.output_path(filename, format)?;
        let encoded = self.encode(format, quality)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        std::fs::write(&path, &encoded.data).map_err(|e| ImageError::Io {
            path: path.clone(),
            source: e,
        })?;

        tracing::info!(
            path = %path.display(),
            format = %format,
            bytes = encoded.data.len(),
            "Saved image"
        );
        Ok(path)
    }

    fn export(&self, format: OutputFormat, quality: EncoderQuality) -> Result<Vec<u8>> {
        let encoded = self.encode(format, quality)?;
        tracing::info!(format = %format, bytes = encoded.data.len(), "Exported image");
        Ok(encoded.data)
    }

    pub fn save_to_bmp(&self, filename: &str) -> Result<PathBuf> {
        self.save_as(filename, OutputFormat::Bmp, EncoderQuality::default())
    }

    pub fn save_to_gif(&self, filename: &str) -> Result<PathBuf> {
        self.save_as(filename, OutputFormat::Gif, EncoderQuality::default())
    }

    pub fn save_to_png(&self, filename: &str) -> Result<PathBuf> {
        self.save_as(filename, OutputFormat::Png, EncoderQuality::default())
    }

    /// JPEG with quality 1-100.
    pub fn save_to_jpg(&self, filename: &str, quality: u8) -> Result<PathBuf> {
        self.save_as(filename, OutputFormat::Jpeg, EncoderQuality::jpeg(quality)?)
    }

    /// Lossy WebP with quality 0-100.
    pub fn save_to_webp(&self, filename: &str, quality: f32) -> Result<PathBuf> {
        self.save_as(filename, OutputFormat::WebP, EncoderQuality::webp(quality)?)
    }

    /// Save as JPEG.
    pub fn save(&self, filename: &str, quality: u8) -> Result<PathBuf> {
        self.save_to_jpg(filename, quality)
    }

    /// Save as JPEG at the session's configured quality.
    pub fn save_default(&self, filename: &str) -> Result<PathBuf> {
        self.save(filename, self.jpeg_quality)
    }

    pub fn save_to_bmp_stream(&self) -> Result<Vec<u8>> {
        self.export(OutputFormat::Bmp, EncoderQuality::default())
    }

    pub fn save_to_gif_stream(&self) -> Result<Vec<u8>> {
        self.export(OutputFormat::Gif, EncoderQuality::default())
    }

    pub fn save_to_png_stream(&self) -> Result<Vec<u8>> {
        self.export(OutputFormat::Png, EncoderQuality::default())
    }

    pub fn save_to_jpg_stream(&self, quality: u8) -> Result<Vec<u8>> {
        self.export(OutputFormat::Jpeg, EncoderQuality::jpeg(quality)?)
    }

    pub fn save_to_webp_stream(&self, quality: f32) -> Result<Vec<u8>> {
        self.export(OutputFormat::WebP, EncoderQuality::webp(quality)?)
    }

    /// Export as WebP.
    pub fn save_to_stream(&self, quality: f32) -> Result<Vec<u8>> {
        self.save_to_webp_stream(quality)
    }

    /// Export as WebP at the session's configured quality.
    pub fn save_to_stream_default(&self) -> Result<Vec<u8>> {
        self.save_to_stream(self.webp_quality)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| ImageError::directory_create_failed(path, e))
}
