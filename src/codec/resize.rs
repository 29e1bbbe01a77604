//! Exact-size resampling

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::RgbaImage;
use std::num::NonZeroU32;

use crate::error::ImageError;

/// Resize a canvas to exactly `target_w` x `target_h` with a Lanczos3 filter
///
/// Aspect ratio is not preserved.
pub fn resize_image(
    img: &RgbaImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, ImageError> {
    let dst_width = NonZeroU32::new(target_w).ok_or_else(|| {
        ImageError::invalid_dimensions(target_w, target_h, "target width is 0")
    })?;
    let dst_height = NonZeroU32::new(target_h).ok_or_else(|| {
        ImageError::invalid_dimensions(target_w, target_h, "target height is 0")
    })?;
    let src_width =
        NonZeroU32::new(img.width()).ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;

    if img.width() == target_w && img.height() == target_h {
        return Ok(img.clone());
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x4)
        .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))
}
