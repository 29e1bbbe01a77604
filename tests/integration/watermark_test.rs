// Watermark integration tests
//
// End-to-end placement and contrast behaviour on real canvases.

use image::{DynamicImage, Rgba, RgbaImage};
use intervention_image::watermark::normalize_position;
use intervention_image::{Anchor, Color, InterventionImage, WatermarkConfig};

#[test]
fn test_blank_canvas_text_at_right_bottom_is_white() {
    let mut session = InterventionImage::blank().unwrap();
    let config = WatermarkConfig::new()
        .with_position("RIGHT-BOTTOM")
        .with_font_size(24.0);

    let stamp = session.add_text_watermark("TEST", Some(&config)).unwrap();

    // Transparent background samples as black, so ink is white
    assert!(stamp.auto_color);
    assert_eq!(stamp.color, Color::white());
    assert_eq!((stamp.origin.x, stamp.origin.y), (800 - 96, 600));

    let canvas = session.canvas();
    let inked = (704..800)
        .flat_map(|x| (570..600).map(move |y| (x, y)))
        .filter(|&(x, y)| canvas.get_pixel(x, y)[3] > 0)
        .count();
    assert!(inked > 0);

    // Drawn pixels carry the white ink
    let sample = (704..800)
        .flat_map(|x| (570..600).map(move |y| (x, y)))
        .map(|(x, y)| *canvas.get_pixel(x, y))
        .find(|p| p[3] > 0)
        .unwrap();
    assert_eq!((sample[0], sample[1], sample[2]), (255, 255, 255));

    // Far corner untouched
    assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
}

#[test]
fn test_dark_text_on_white_background() {
    let white = RgbaImage::from_pixel(300, 100, Rgba([255, 255, 255, 255]));
    let mut session = InterventionImage::from_buffer(white);

    let config = WatermarkConfig::new().with_position("left top");
    let stamp = session.add_text_watermark("hello", Some(&config)).unwrap();

    assert_eq!(stamp.color, Color::black());
    assert!(session
        .canvas()
        .pixels()
        .any(|p| p[0] < 128 && p[1] < 128 && p[2] < 128));
}

#[test]
fn test_anchor_normalization() {
    assert_eq!(normalize_position(" left   buttom "), "LEFT BOTTOM");
    assert_eq!(Anchor::parse(" left   buttom "), Some(Anchor::LeftBottom));
    assert_eq!(Anchor::parse("Right  Top"), Some(Anchor::RightTop));
}

#[test]
fn test_watermarks_accumulate() {
    let mut session = InterventionImage::blank_with_size(200, 200).unwrap();
    let red = RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255]));
    let blue = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 255, 255]));

    session.add_image_watermark_from(
        &DynamicImage::ImageRgba8(red),
        Some(&WatermarkConfig::new().with_position("left top")),
    );
    session.add_image_watermark_from(
        &DynamicImage::ImageRgba8(blue),
        Some(&WatermarkConfig::new().with_position("right bottom")),
    );
    session
        .add_text_watermark(
            "mark",
            Some(&WatermarkConfig::new().with_position("center center")),
        )
        .unwrap();

    let canvas = session.canvas();
    assert_eq!(canvas.get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    assert_eq!(canvas.get_pixel(195, 195), &Rgba([0, 0, 255, 255]));
    assert!((60..140)
        .flat_map(|x| (80..120).map(move |y| (x, y)))
        .any(|(x, y)| canvas.get_pixel(x, y)[3] > 0));
}

#[test]
fn test_image_watermark_from_file_centered() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    RgbaImage::from_pixel(7, 7, Rgba([0, 255, 0, 255]))
        .save(&logo_path)
        .unwrap();

    let mut session = InterventionImage::blank_with_size(10, 10).unwrap();
    let stamp = session
        .add_image_watermark(
            Some(&logo_path),
            Some(&WatermarkConfig::new().with_position("CENTER CENTER")),
        )
        .unwrap();

    assert_eq!((stamp.position.x, stamp.position.y), (1, 1));
    assert_eq!(session.canvas().get_pixel(0, 0)[3], 0);
    assert_eq!(session.canvas().get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
    assert_eq!(session.canvas().get_pixel(7, 7), &Rgba([0, 255, 0, 255]));
    assert_eq!(session.canvas().get_pixel(8, 8)[3], 0);
}

#[test]
fn test_custom_font_file() {
    let dir = tempfile::tempdir().unwrap();
    let font_path = dir.path().join("mono.ttf");
    std::fs::write(
        &font_path,
        include_bytes!("../../src/watermark/fonts/DejaVuSansMono.ttf"),
    )
    .unwrap();

    let mut session = InterventionImage::blank_with_size(100, 40).unwrap();
    let config = WatermarkConfig::new()
        .with_font_path(&font_path)
        .with_color(Color::rgb(0, 200, 0));
    session.add_text_watermark("ok", Some(&config)).unwrap();

    assert!(session.canvas().pixels().any(|p| p[1] == 200 && p[3] > 0));
}

#[test]
fn test_oversized_font_returns_error() {
    let mut session = InterventionImage::blank_with_size(10, 10).unwrap();
    let config = WatermarkConfig::new()
        .with_position("right top")
        .with_font_size(2_147_483_648.0);

    let result = session.add_text_watermark("A", Some(&config));
    assert!(matches!(
        result,
        Err(intervention_image::ImageError::InvalidParameter { .. })
    ));
    assert!(session.canvas().pixels().all(|p| p[3] == 0));

    // Defaults with a huge size are refused too
    assert!(session.set_watermark(config).is_err());
}
