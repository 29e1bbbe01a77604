//! Captcha code and background generation.
//!
//! All randomness comes from a caller-owned [`Rng`], so a seeded generator
//! reproduces the same code and background.

use image::{Rgba, RgbaImage};
use rand::Rng;

/// Characters a captcha code is drawn from. Look-alikes such as `0`, `1`,
/// `o` and `l` are excluded.
pub const CODE_ALPHABET: &[u8] = b"asdfghjkzxcvbnmqwertyuipASDFGHJKLZXCVBNMQWERTYUP23456789";

/// Lowest red/green channel value of the background.
const CHANNEL_MIN: u8 = 150;
/// Exclusive upper bound of the red/green channel range.
const CHANNEL_MAX: u8 = 255;

/// Generate a code of `len` characters from [`CODE_ALPHABET`].
pub fn random_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Paint the captcha background.
///
/// Red depends only on the column and green only on `x + y`, which gives
/// the background its diagonal banding. Blue and alpha are fixed at 255.
pub fn paint_background<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> RgbaImage {
    let reds: Vec<u8> = (0..width)
        .map(|_| rng.gen_range(CHANNEL_MIN..CHANNEL_MAX))
        .collect();
    let greens: Vec<u8> = (0..width as u64 + height as u64)
        .map(|_| rng.gen_range(CHANNEL_MIN..CHANNEL_MAX))
        .collect();

    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            reds[x as usize],
            greens[x as usize + y as usize],
            255,
            255,
        ])
    })
}

/// Font size that fits `count` characters across `width` pixels.
pub fn captcha_font_size(width: u32, count: usize) -> f32 {
    let divisor = count.saturating_sub(2).max(1) as u32;
    (width / divisor) as f32
}
