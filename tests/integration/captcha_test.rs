// Captcha integration tests

use image::{Rgba, RgbaImage};
use intervention_image::captcha::CODE_ALPHABET;
use intervention_image::{ImageError, InterventionImage, OutputFormat};

#[test]
fn test_captcha_code_and_canvas() {
    let mut session = InterventionImage::blank().unwrap();
    let code = session.generate_captcha(6, 200, 60).unwrap();

    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    assert_eq!(session.dimensions(), (200, 60));

    // Background is opaque with red and green in the procedural range
    let corner = session.canvas().get_pixel(0, 0);
    assert_eq!(corner[3], 255);
    assert!(corner[0] >= 150);
    assert!(corner[1] >= 150);
}

#[test]
fn test_seeded_captchas_differ_by_seed() {
    let mut a = InterventionImage::blank().unwrap();
    let mut b = InterventionImage::blank().unwrap();

    let code_a = a.generate_captcha_with_seed(1, 8, 160, 50).unwrap();
    let code_b = b.generate_captcha_with_seed(2, 8, 160, 50).unwrap();

    assert_ne!(a.canvas(), b.canvas());
    assert_eq!(code_a.len(), code_b.len());
}

#[test]
fn test_captcha_over_existing_image_keeps_content() {
    let photo = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
    let mut session = InterventionImage::from_buffer(photo);

    session.generate_captcha_with_seed(3, 4, 40, 40).unwrap();

    assert_eq!(session.dimensions(), (40, 40));
    assert_eq!(session.canvas().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    assert!(session.canvas().pixels().any(|p| p[0] > 128));
}

#[test]
fn test_captcha_exports() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = InterventionImage::blank()
        .unwrap()
        .with_save_folder(dir.path())
        .unwrap();
    let code = session.generate_captcha_with_seed(11, 5, 150, 50).unwrap();

    let path = session.save_to_png(&code).unwrap();
    assert_eq!(path, dir.path().join(format!("{}.png", code)));

    let stream = session.save_to_stream(60.0).unwrap();
    assert_eq!(
        intervention_image::codec::detect_format(&stream),
        Some(OutputFormat::WebP)
    );
}

#[test]
fn test_captcha_invalid_arguments() {
    let mut session = InterventionImage::blank().unwrap();
    assert!(matches!(
        session.generate_captcha(0, 100, 40),
        Err(ImageError::InvalidParameter { .. })
    ));
    assert!(matches!(
        session.generate_captcha(4, 100, 0),
        Err(ImageError::InvalidDimensions { .. })
    ));
    // Failed calls leave the canvas alone
    assert_eq!(session.dimensions(), (800, 600));
}
