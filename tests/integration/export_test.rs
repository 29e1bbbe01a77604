// Export integration tests
//
// Every format is written to a temp folder and checked by content, not name.

use image::{Rgba, RgbaImage};
use intervention_image::codec::detect_format;
use intervention_image::{ImageError, InterventionImage, OutputFormat};

fn checkerboard(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Rgba([220, 30, 30, 255])
        } else {
            Rgba([30, 30, 220, 255])
        }
    })
}

fn session_in(dir: &std::path::Path) -> InterventionImage {
    InterventionImage::from_buffer(checkerboard(32))
        .with_save_folder(dir)
        .unwrap()
}

#[test]
fn test_save_every_format_to_folder() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let written = [
        (session.save_to_bmp("out").unwrap(), OutputFormat::Bmp, "out.bmp"),
        (session.save_to_gif("out").unwrap(), OutputFormat::Gif, "out.gif"),
        (session.save_to_png("out").unwrap(), OutputFormat::Png, "out.png"),
        (session.save_to_jpg("out", 90).unwrap(), OutputFormat::Jpeg, "out.jpg"),
        (session.save_to_webp("out", 75.0).unwrap(), OutputFormat::WebP, "out.webp"),
    ];

    for (path, format, name) in written {
        assert_eq!(path, dir.path().join(name));
        let data = std::fs::read(&path).unwrap();
        assert_eq!(detect_format(&data), Some(format), "{}", name);
    }
}

#[test]
fn test_save_is_jpeg_and_stream_is_webp() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let path = session.save("default", 80).unwrap();
    assert_eq!(path, dir.path().join("default.jpg"));
    let data = std::fs::read(&path).unwrap();
    assert_eq!(detect_format(&data), Some(OutputFormat::Jpeg));

    let stream = session.save_to_stream(80.0).unwrap();
    assert_eq!(detect_format(&stream), Some(OutputFormat::WebP));
    assert_eq!(&stream[0..4], b"RIFF");
}

#[test]
fn test_stream_exports_decode_to_same_size() {
    let session = InterventionImage::from_buffer(checkerboard(24));

    let streams = [
        session.save_to_bmp_stream().unwrap(),
        session.save_to_gif_stream().unwrap(),
        session.save_to_png_stream().unwrap(),
        session.save_to_jpg_stream(70).unwrap(),
        session.save_to_webp_stream(70.0).unwrap(),
    ];

    for data in &streams {
        let decoded = InterventionImage::from_bytes(data).unwrap();
        assert_eq!(decoded.dimensions(), (24, 24));
    }
}

#[test]
fn test_export_does_not_modify_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    let before = session.canvas().clone();

    session.save_to_jpg("a", 10).unwrap();
    session.save_to_webp_stream(5.0).unwrap();

    assert_eq!(session.canvas(), &before);
}

#[test]
fn test_empty_name_uses_source_stem() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("portrait.png");
    checkerboard(8).save(&source).unwrap();
    let out = dir.path().join("exports");

    let session = InterventionImage::open(&source)
        .unwrap()
        .with_save_folder(&out)
        .unwrap();

    assert_eq!(session.save_to_gif("").unwrap(), out.join("portrait.gif"));
    assert_eq!(session.save_to_png("renamed.bmp").unwrap(), out.join("renamed.png"));
}

#[test]
fn test_quality_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    assert!(matches!(
        session.save_to_jpg("q", 101),
        Err(ImageError::InvalidQuality { .. })
    ));
    assert!(matches!(
        session.save_to_webp("q", -1.0),
        Err(ImageError::InvalidQuality { .. })
    ));
    assert!(!dir.path().join("q.jpg").exists());
    assert!(!dir.path().join("q.webp").exists());
}

#[test]
fn test_lower_jpeg_quality_is_smaller() {
    let session = InterventionImage::from_buffer(RgbaImage::from_fn(128, 128, |x, y| {
        Rgba([(x * 2) as u8, (y * 2) as u8, ((x * y) % 256) as u8, 255])
    }));

    let high = session.save_to_jpg_stream(95).unwrap();
    let low = session.save_to_jpg_stream(10).unwrap();
    assert!(low.len() < high.len());
}
