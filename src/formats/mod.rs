//! Format registry: the supported text and image formats
//!
//! Every format the converter understands is a variant of [`Format`]. The
//! registry table is static data; codec selection matches on the enum so a
//! new format cannot be added without handling it everywhere.

pub mod capability;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use capability::can_convert;

/// Broad family a format belongs to. Conversions never cross categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Text,
    Image,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Image => "image",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported file format, identified by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Xml,
    Txt,
    Jpg,
    Jpeg,
    Png,
    Bmp,
    Gif,
    Tiff,
}

/// Immutable registry entry describing one format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub format: Format,
    pub extension: &'static str,
    pub display_name: &'static str,
    pub category: Category,
}

const fn descriptor(
    format: Format,
    extension: &'static str,
    display_name: &'static str,
    category: Category,
) -> FormatDescriptor {
    FormatDescriptor {
        format,
        extension,
        display_name,
        category,
    }
}

static REGISTRY: [FormatDescriptor; 10] = [
    descriptor(Format::Csv, "csv", "CSV File", Category::Text),
    descriptor(Format::Json, "json", "JSON File", Category::Text),
    descriptor(Format::Xml, "xml", "XML File", Category::Text),
    descriptor(Format::Txt, "txt", "Text File", Category::Text),
    descriptor(Format::Jpg, "jpg", "JPEG Image", Category::Image),
    descriptor(Format::Jpeg, "jpeg", "JPEG Image", Category::Image),
    descriptor(Format::Png, "png", "PNG Image", Category::Image),
    descriptor(Format::Bmp, "bmp", "BMP Image", Category::Image),
    descriptor(Format::Gif, "gif", "GIF Image", Category::Image),
    descriptor(Format::Tiff, "tiff", "TIFF Image", Category::Image),
];

/// All registered formats in display order
pub fn registry() -> &'static [FormatDescriptor] {
    &REGISTRY
}

/// Registered formats of one category
pub fn by_category(category: Category) -> impl Iterator<Item = &'static FormatDescriptor> {
    REGISTRY.iter().filter(move |d| d.category == category)
}

impl Format {
    pub const ALL: [Format; 10] = [
        Format::Csv,
        Format::Json,
        Format::Xml,
        Format::Txt,
        Format::Jpg,
        Format::Jpeg,
        Format::Png,
        Format::Bmp,
        Format::Gif,
        Format::Tiff,
    ];

    /// Look up a format by extension, ignoring case and a leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        REGISTRY
            .iter()
            .find(|d| d.extension.eq_ignore_ascii_case(ext))
            .map(|d| d.format)
    }

    /// Detect the format of a file from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            Format::Csv => &REGISTRY[0],
            Format::Json => &REGISTRY[1],
            Format::Xml => &REGISTRY[2],
            Format::Txt => &REGISTRY[3],
            Format::Jpg => &REGISTRY[4],
            Format::Jpeg => &REGISTRY[5],
            Format::Png => &REGISTRY[6],
            Format::Bmp => &REGISTRY[7],
            Format::Gif => &REGISTRY[8],
            Format::Tiff => &REGISTRY[9],
        }
    }

    pub fn extension(self) -> &'static str {
        self.descriptor().extension
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn category(self) -> Category {
        match self {
            Format::Csv | Format::Json | Format::Xml | Format::Txt => Category::Text,
            Format::Jpg | Format::Jpeg | Format::Png | Format::Bmp | Format::Gif | Format::Tiff => {
                Category::Image
            }
        }
    }

    pub fn is_text(self) -> bool {
        self.category() == Category::Text
    }

    pub fn is_image(self) -> bool {
        self.category() == Category::Image
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("Unsupported format '{}'", s))
    }
}
