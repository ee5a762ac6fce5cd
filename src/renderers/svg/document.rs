//! Whole-document SVG output.
//!
//! Assembles the root element from the first frame: defs, background,
//! then the shapes in z order. Output is a single line after the
//! doctype preamble.

use std::fs;
use std::path::Path;

use crate::error::{SaveError, SaveResult};
use crate::models::{Background, Document, Frame};
use crate::parse::{FAINT_NS, SVG_NS, XLINK_NS};

use super::defs::{image_data_uri, SvgBuildState};
use super::elements::build_shape;
use super::style::to_rgb_color;
use super::tree::SvgElement;

const PREAMBLE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                        <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n  \
                        \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";

/// Serializes the document's first frame as an SVG string.
pub fn to_svg_string(image: &Document) -> SaveResult<String> {
    let frame = image.first_frame().ok_or(SaveError::EmptyDocument)?;

    let mut root = SvgElement::new("svg");
    root.set("version", "1.1");
    root.set("xmlns", SVG_NS);
    root.set("xmlns:faint", FAINT_NS);
    root.set("xmlns:xlink", XLINK_NS);
    root.set("width", frame.width.to_string());
    root.set("height", frame.height.to_string());

    let mut state = SvgBuildState::new();
    let mut shapes = Vec::new();
    for shape in &frame.shapes {
        if let Some(element) = build_shape(shape, &mut state) {
            shapes.push(element);
        }
    }

    // Defs collect during the shape walk but serialize first.
    root.append(state.into_defs(frame.calibration.as_ref()));
    if let Some(background) = &frame.background {
        root.append(background_element(background, frame));
    }
    root.extend(shapes);

    Ok(format!("{}{}", PREAMBLE, root.to_svg()?))
}

/// Writes the document to an SVG file.
pub fn write_svg_file(path: impl AsRef<Path>, image: &Document) -> SaveResult<()> {
    let markup = to_svg_string(image)?;
    fs::write(path, markup)?;
    Ok(())
}

fn background_element(background: &Background, frame: &Frame) -> SvgElement {
    match background {
        Background::Color(color) => {
            let mut element = SvgElement::new("rect");
            element.set("faint:background", "1");
            element.set("x", "0");
            element.set("y", "0");
            element.set("width", "100%");
            element.set("height", "100%");
            element.set("fill", to_rgb_color(*color));
            element
        }
        Background::Image(image) => {
            let mut element = SvgElement::new("image");
            element.set("faint:background", "1");
            element.set("x", "0");
            element.set("y", "0");
            element.set("width", frame.width.to_string());
            element.set("height", frame.height.to_string());
            element.set("xlink:href", image_data_uri(image));
            element
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{tri_from_rect, Point, Rect};
    use crate::models::{
        Calibration, EmbeddedImage, LineShape, PaintStyle, RectShape, Rgba, Shape,
    };

    #[test]
    fn empty_document_cannot_be_saved() {
        let doc = Document::new();
        assert!(matches!(
            to_svg_string(&doc),
            Err(SaveError::EmptyDocument)
        ));
    }

    #[test]
    fn output_starts_with_doctype_preamble() {
        let mut doc = Document::new();
        doc.add_frame(640, 480);
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE svg"));
        // One preamble newline block, then a single line of markup.
        assert_eq!(svg.lines().count(), 4);
    }

    #[test]
    fn root_carries_namespaces_and_size() {
        let mut doc = Document::new();
        doc.add_frame(640, 480);
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.contains(
            "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:faint=\"http://www.code.google.com/p/faint-graphics-editor\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"640\" height=\"480\">"
        ));
    }

    #[test]
    fn defs_element_is_always_present() {
        let mut doc = Document::new();
        doc.add_frame(100, 100);
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.contains("<defs/>"));
    }

    #[test]
    fn background_color_saves_as_full_size_rect() {
        let mut doc = Document::new();
        let frame = doc.add_frame(100, 100);
        frame.background = Some(Background::Color(Rgba::rgb(10, 20, 30)));
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.contains(
            "<rect faint:background=\"1\" x=\"0\" y=\"0\" width=\"100%\" \
             height=\"100%\" fill=\"rgb(10, 20, 30)\"/>"
        ));
    }

    #[test]
    fn background_image_uses_frame_size() {
        let mut doc = Document::new();
        let frame = doc.add_frame(64, 32);
        frame.background = Some(Background::Image(EmbeddedImage::png(vec![1, 2])));
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.contains("<image faint:background=\"1\" x=\"0\" y=\"0\" width=\"64\" height=\"32\""));
    }

    #[test]
    fn calibration_saves_inside_defs() {
        let mut doc = Document::new();
        let frame = doc.add_frame(100, 100);
        frame.calibration = Some(Calibration {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            length: 25.0,
            unit: "mm".to_string(),
        });
        let svg = to_svg_string(&doc).unwrap();
        assert!(svg.contains("<defs><faint:calibration"));
    }

    #[test]
    fn shapes_follow_defs_and_background() {
        let mut doc = Document::new();
        let frame = doc.add_frame(100, 100);
        frame.background = Some(Background::Color(Rgba::black()));
        frame.shapes.push(Shape::Rect(RectShape::new(
            tri_from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            PaintStyle::default(),
        )));
        frame.shapes.push(Shape::Line(LineShape::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            PaintStyle::default(),
        )));
        let svg = to_svg_string(&doc).unwrap();
        let defs_at = svg.find("<defs").unwrap();
        let background_at = svg.find("faint:background").unwrap();
        let polygon_at = svg.find("<polygon").unwrap();
        let line_at = svg.find("<line").unwrap();
        assert!(defs_at < background_at);
        assert!(background_at < polygon_at);
        assert!(polygon_at < line_at);
    }
}
