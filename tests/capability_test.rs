use fileconv::formats::{self, Category};
use fileconv::{can_convert, Format};
use pretty_assertions::assert_eq;

#[test]
fn test_no_cross_category_edges() {
    for format in Format::ALL {
        for target in format.targets() {
            assert_eq!(
                format.category(),
                target.category(),
                "{} -> {} crosses categories",
                format,
                target
            );
            assert_ne!(format, *target);
        }
    }
}

#[test]
fn test_every_registered_format_has_targets() {
    for descriptor in formats::registry() {
        assert!(!descriptor.format.targets().is_empty(), "{}", descriptor.extension);
    }
}

#[test]
fn test_can_convert_by_extension() {
    assert!(can_convert("csv", "json"));
    assert!(can_convert("xml", "csv"));
    assert!(can_convert("png", "jpg"));
    assert!(can_convert("jpeg", "tiff"));

    assert!(!can_convert("csv", "png"));
    assert!(!can_convert("png", "txt"));
    assert!(!can_convert("yaml", "json"));
    assert!(!can_convert("json", "json"));
}

#[test]
fn test_registry_split_by_category() {
    let text: Vec<&str> = formats::by_category(Category::Text)
        .map(|d| d.extension)
        .collect();
    assert_eq!(text, vec!["csv", "json", "xml", "txt"]);

    let images = formats::by_category(Category::Image).count();
    assert_eq!(images, 6);
}
