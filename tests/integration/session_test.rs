// Session lifecycle integration tests
//
// Covers construction from every source, resizing and the PNG round-trip.

use image::{DynamicImage, Rgba, RgbaImage};
use intervention_image::{Config, ImageError, InterventionImage, SessionOptions};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            if (x + y) % 3 == 0 { 128 } else { 255 },
        ])
    })
}

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageOutputFormat::Png)
        .unwrap();
    buffer.into_inner()
}

#[test]
fn test_png_round_trip_is_lossless() {
    let original = gradient(37, 23);
    let session = InterventionImage::from_buffer(original.clone());

    let png = session.save_to_png_stream().unwrap();
    let decoded = InterventionImage::from_bytes(&png).unwrap();

    assert_eq!(decoded.canvas(), &original);
}

#[test]
fn test_open_then_resize_to_exact_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.png");
    std::fs::write(&path, encode_png(&gradient(640, 480))).unwrap();

    let mut session = InterventionImage::open(&path).unwrap();
    assert_eq!(session.dimensions(), (640, 480));

    session.resize(300, 600).unwrap();
    assert_eq!(session.dimensions(), (300, 600));

    session.resize(640, 480).unwrap();
    assert_eq!(session.dimensions(), (640, 480));
}

#[test]
fn test_from_bytes_rejects_garbage() {
    let result = InterventionImage::from_bytes(b"\x00\x01\x02 not an image");
    assert!(matches!(result, Err(ImageError::DecodeFailed { .. })));
}

#[test]
fn test_open_corrupt_file_is_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is truncated").unwrap();

    let result = InterventionImage::open(&path);
    assert!(matches!(result, Err(ImageError::DecodeFailed { .. })));
}

#[test]
fn test_options_with_file_and_folder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.png");
    std::fs::write(&path, encode_png(&gradient(16, 16))).unwrap();
    let out = dir.path().join("nested").join("out");

    let session = InterventionImage::new(SessionOptions {
        file_path: Some(path.clone()),
        save_folder: Some(out.clone()),
        ..Default::default()
    })
    .unwrap();

    assert!(out.is_dir());
    assert_eq!(session.source_path(), Some(path.as_path()));
    assert_eq!(session.dimensions(), (16, 16));
}

#[test]
fn test_decoded_image_source() {
    let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(5, 4, image::Luma([77])));
    let session = InterventionImage::new(SessionOptions {
        image: Some(img),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(session.canvas().get_pixel(2, 2), &Rgba([77, 77, 77, 255]));
}

#[test]
fn test_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exports");
    let yaml = format!(
        "save_folder: {}\nblank_width: 120\nblank_height: 90\njpeg_quality: 55\nwatermark:\n  position: left-top\n  color: \"#FF0000\"\n",
        out.display()
    );
    let config_path = dir.path().join("image.yaml");
    std::fs::write(&config_path, yaml).unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let mut session = InterventionImage::from_config(&config).unwrap();

    assert_eq!(session.dimensions(), (120, 90));
    assert!(out.is_dir());

    let stamp = session.add_text_watermark("cfg", None).unwrap();
    assert_eq!((stamp.origin.x, stamp.origin.y), (0, 12));
    assert!(!stamp.auto_color);

    let path = session.save_default("configured").unwrap();
    assert_eq!(path, out.join("configured.jpg"));
    assert!(path.is_file());
}

#[test]
fn test_sessions_are_independent() {
    let mut a = InterventionImage::blank_with_size(20, 20).unwrap();
    let b = InterventionImage::blank_with_size(20, 20).unwrap();

    a.resize(10, 10).unwrap();
    assert_eq!(a.dimensions(), (10, 10));
    assert_eq!(b.dimensions(), (20, 20));
}
