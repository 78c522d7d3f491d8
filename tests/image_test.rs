use fileconv::conversion::convert_file_to;
use fileconv::{ConversionSettings, Format};
use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tempfile::tempdir;

fn write_png(path: &Path, pixel: Rgba<u8>) {
    RgbaImage::from_pixel(32, 32, pixel)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn test_transparent_png_to_jpeg_is_white() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("clear.png");
    write_png(&input, Rgba([200, 0, 0, 0]));

    let output = convert_file_to(&input, Format::Jpg, tmp.path(), &ConversionSettings::default())
        .unwrap();
    assert_eq!(output, tmp.path().join("clear.jpg"));

    let decoded = image::open(&output).unwrap();
    let [r, g, b, _] = decoded.get_pixel(16, 16).0;
    // JPEG is lossy; a uniform image stays within a small tolerance
    for channel in [r, g, b] {
        assert!(channel >= 250, "expected white, got {:?}", (r, g, b));
    }
}

#[test]
fn test_opaque_png_to_bmp_keeps_colour() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("solid.png");
    write_png(&input, Rgba([10, 120, 230, 255]));

    let output = convert_file_to(&input, Format::Bmp, tmp.path(), &ConversionSettings::default())
        .unwrap();

    let decoded = image::open(&output).unwrap();
    assert_eq!(decoded.dimensions(), (32, 32));
    let [r, g, b, a] = decoded.get_pixel(0, 0).0;
    assert_eq!((r, g, b, a), (10, 120, 230, 255));
}

#[test]
fn test_png_to_gif_and_tiff() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("half.png");
    write_png(&input, Rgba([0, 0, 0, 128]));

    for target in [Format::Gif, Format::Tiff] {
        let output =
            convert_file_to(&input, target, tmp.path(), &ConversionSettings::default()).unwrap();
        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
        assert!(!decoded.color().has_alpha() || decoded.get_pixel(5, 5).0[3] == 255);
    }
}

#[test]
fn test_corrupt_image_is_decode_error() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("broken.png");
    std::fs::write(&input, b"definitely not a png").unwrap();

    let err = convert_file_to(&input, Format::Jpg, tmp.path(), &ConversionSettings::default())
        .unwrap_err();
    assert_eq!(err.category(), "DecodeError");
    assert!(!tmp.path().join("broken.jpg").exists());
}

#[test]
fn test_image_to_text_is_rejected() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("pic.png");
    write_png(&input, Rgba([0, 0, 0, 255]));

    let err = convert_file_to(&input, Format::Json, tmp.path(), &ConversionSettings::default())
        .unwrap_err();
    assert_eq!(err.category(), "CapabilityError");
}
