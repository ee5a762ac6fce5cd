// Test reading and writing SVG files on disk

use faint_svg::error::{LoadError, SaveError};
use faint_svg::geom::{tri_from_rect, Rect};
use faint_svg::models::{Document, PaintStyle, RectShape, Shape};
use faint_svg::{parse_svg_file, parse_svg_string, to_svg_string, write_svg_file};

fn sample_document() -> Document {
    let mut image = Document::new();
    let frame = image.add_frame(800, 600);
    frame.add_shape(Shape::Rect(RectShape::new(
        tri_from_rect(Rect::new(10.0, 20.0, 40.0, 15.0)),
        PaintStyle::default(),
    )));
    image
}

#[test]
fn test_write_then_read_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("drawing.svg");

    let original = sample_document();
    write_svg_file(&path, &original).expect("write should succeed");

    let mut reloaded = Document::new();
    parse_svg_file(&path, &mut reloaded, "en").expect("read should succeed");

    let frame = reloaded.first_frame().expect("frame");
    assert_eq!((frame.width, frame.height), (800, 600));
    assert_eq!(frame.shapes, original.first_frame().expect("frame").shapes);
}

#[test]
fn test_written_file_matches_string_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("drawing.svg");

    let image = sample_document();
    write_svg_file(&path, &image).expect("write should succeed");

    let on_disk = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(on_disk, to_svg_string(&image).expect("string output"));
}

#[test]
fn test_missing_file_reports_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut image = Document::new();
    let err = parse_svg_file(dir.path().join("nope.svg"), &mut image, "en").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)), "{:?}", err);
}

#[test]
fn test_empty_document_cannot_be_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.svg");

    let err = write_svg_file(&path, &Document::new()).unwrap_err();
    assert!(matches!(err, SaveError::EmptyDocument), "{:?}", err);
    assert!(!path.exists(), "nothing should be written on failure");
}

#[test]
fn test_frame_size_roundtrips_through_markup() {
    let markup = to_svg_string(&sample_document()).expect("save");
    assert!(markup.contains("width=\"800\""));
    assert!(markup.contains("height=\"600\""));

    let mut reloaded = Document::new();
    parse_svg_string(&markup, &mut reloaded, "en").expect("load");
    let frame = reloaded.first_frame().expect("frame");
    assert_eq!((frame.width, frame.height), (800, 600));
}

#[test]
fn test_reload_reports_no_warnings() {
    // A clean save of supported content should import without defects.
    let markup = to_svg_string(&sample_document()).expect("save");
    let mut reloaded = Document::new();
    parse_svg_string(&markup, &mut reloaded, "en").expect("load");
    assert!(
        reloaded.warnings.is_empty(),
        "unexpected warnings: {:?}",
        reloaded.warnings
    );
}

#[test]
fn test_non_svg_content_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("page.svg");
    std::fs::write(&path, "<html xmlns='http://www.w3.org/2000/svg'/>").expect("write");

    let mut image = Document::new();
    let err = parse_svg_file(&path, &mut image, "en").unwrap_err();
    assert!(matches!(err, LoadError::NotSvg), "{:?}", err);
}
