//! Conversion capability map: which source formats may become which targets

use super::Format;

/// Legal targets for a source format.
///
/// Text formats only map to text formats and image formats only to image
/// formats. `jpeg` is accepted as a source but `jpg` is the only JPEG target.
pub fn targets(source: Format) -> &'static [Format] {
    use Format::*;

    match source {
        Csv => &[Json, Xml, Txt],
        Json => &[Csv, Xml, Txt],
        Xml => &[Json, Csv, Txt],
        Txt => &[Json, Csv, Xml],
        Jpg | Jpeg => &[Png, Bmp, Gif, Tiff],
        Png => &[Jpg, Bmp, Gif, Tiff],
        Bmp => &[Jpg, Png, Gif, Tiff],
        Gif => &[Jpg, Png, Bmp, Tiff],
        Tiff => &[Jpg, Png, Bmp, Gif],
    }
}

impl Format {
    /// Legal conversion targets for this format
    pub fn targets(self) -> &'static [Format] {
        targets(self)
    }

    pub fn can_convert_to(self, target: Format) -> bool {
        targets(self).contains(&target)
    }
}

/// Check whether a file with `source_ext` can be converted to `target_ext`.
///
/// Unknown extensions on either side yield `false`.
pub fn can_convert(source_ext: &str, target_ext: &str) -> bool {
    match (
        Format::from_extension(source_ext),
        Format::from_extension(target_ext),
    ) {
        (Some(source), Some(target)) => source.can_convert_to(target),
        _ => false,
    }
}
