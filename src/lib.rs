// Intervention Image Library
// Open, resize, watermark, captcha and export images

pub mod captcha;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod watermark;

pub use codec::{EncoderQuality, OutputFormat};
pub use config::Config;
pub use error::{ImageError, Result};
pub use session::{InterventionImage, SessionOptions};
pub use watermark::{Anchor, Color, ImageStamp, TextStamp, WatermarkConfig, WatermarkSettings};
