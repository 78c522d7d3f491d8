//! Image recoding between the supported raster formats
//!
//! Images with an alpha channel are flattened onto an opaque white canvas
//! before encoding, so every output is opaque RGB (or the source's own
//! opaque pixel layout when it had no alpha).

use crate::error::{ConversionError, ConversionErrorKind, ConversionResult};
use crate::formats::Format;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Map a registered image format onto the codec that writes it
pub fn image_format(format: Format) -> Option<ImageFormat> {
    match format {
        Format::Jpg | Format::Jpeg => Some(ImageFormat::Jpeg),
        Format::Png => Some(ImageFormat::Png),
        Format::Bmp => Some(ImageFormat::Bmp),
        Format::Gif => Some(ImageFormat::Gif),
        Format::Tiff => Some(ImageFormat::Tiff),
        Format::Csv | Format::Json | Format::Xml | Format::Txt => None,
    }
}

/// Decode an image file, detecting the codec from its content
pub fn open_image(path: &Path) -> ConversionResult<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| ConversionError::io(e, path))?;

    reader.decode().map_err(|e| {
        ConversionError::conversion_with_source(
            ConversionErrorKind::Decode {
                message: format!("{}: {}", path.display(), e),
            },
            e.into(),
        )
    })
}

/// Composite an image with alpha onto white; opaque images pass through
pub fn flatten_alpha(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (dst, src) in canvas.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([blend(r), blend(g), blend(b)]);
    }

    DynamicImage::ImageRgb8(canvas)
}

/// Convert pixel layouts the target encoder cannot write into 8-bit RGB
fn prepare_for_target(image: DynamicImage, target: ImageFormat) -> DynamicImage {
    let supported = match target {
        ImageFormat::Jpeg => matches!(image.color(), ColorType::L8 | ColorType::Rgb8),
        ImageFormat::Gif => matches!(image.color(), ColorType::Rgb8 | ColorType::Rgba8),
        ImageFormat::Bmp => matches!(
            image.color(),
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
        ),
        ImageFormat::Png => !matches!(image.color(), ColorType::Rgb32F | ColorType::Rgba32F),
        _ => true,
    };

    if supported {
        image
    } else {
        tracing::debug!(color = ?image.color(), format = ?target, "converting pixels to 8-bit RGB");
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

/// Encode an image into the given registered format
pub fn encode(image: &DynamicImage, target: Format) -> ConversionResult<Vec<u8>> {
    let format = image_format(target).ok_or_else(|| not_image(target))?;

    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).map_err(|e| {
        ConversionError::conversion_with_source(
            ConversionErrorKind::Encode {
                message: format!("cannot write {}: {}", target.display_name(), e),
            },
            e.into(),
        )
    })?;

    Ok(cursor.into_inner())
}

/// Open an image, flatten any transparency and re-encode it as `target`
pub fn recode(source: &Path, target: Format) -> ConversionResult<Vec<u8>> {
    let codec = image_format(target).ok_or_else(|| not_image(target))?;

    let image = open_image(source)?;
    tracing::debug!(
        path = %source.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "decoded image"
    );

    let image = prepare_for_target(flatten_alpha(image), codec);
    encode(&image, target)
}

fn not_image(format: Format) -> ConversionError {
    ConversionError::conversion(ConversionErrorKind::validation(
        format!("{} is not an image format", format.display_name()),
        None,
    ))
}
