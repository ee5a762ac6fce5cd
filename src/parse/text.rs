//! Importer for SVG text elements.
//!
//! Editor text keeps more than SVG renders: box extents, vertical
//! alignment, hard line breaks and the unevaluated source of parsed
//! text all ride along in faint attributes.

use super::color::parse_color;
use super::length::Axis;
use super::state::ParseState;
use super::style::get_style_dict;
use super::{faint_attr, is_faint_element, is_svg_element, XmlNode};
use crate::error::LoadResult;
use crate::geom::{tri_from_rect, Rect};
use crate::models::{HAlign, Shape, TextShape, VAlign};

/// The text content: any leading text, then the tspan lines. A tspan
/// marked faint:hardbreak ends with an editor line break.
fn text_content(node: XmlNode) -> String {
    let mut content = String::new();
    let mut seen_element = false;
    for child in node.children() {
        if child.is_element() {
            seen_element = true;
            if is_svg_element(child, "tspan") {
                content.push_str(child.text().unwrap_or(""));
                if faint_attr(child, "hardbreak") == Some("1") {
                    content.push('\n');
                }
            }
        } else if child.is_text() && !seen_element {
            content.push_str(child.text().unwrap_or(""));
        }
    }
    content
}

/// The verbatim source of a parsed text object, kept in a faint:raw
/// child so expression evaluation does not drift across round trips.
fn raw_content(node: XmlNode) -> Option<String> {
    node.children()
        .find(|child| is_faint_element(*child, "raw"))
        .map(|child| child.text().unwrap_or("").to_string())
}

pub fn parse_text(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let mut x = state.svg_length_attr(node.attribute("x").unwrap_or("0"), Axis::X)?;
    let y = state.svg_length_attr(node.attribute("y").unwrap_or("0"), Axis::Y)?;

    let w_attr = faint_attr(node, "width").or_else(|| node.attribute("width"));
    let h_attr = faint_attr(node, "height").or_else(|| node.attribute("height"));
    let boxed = w_attr.is_some() && h_attr.is_some();
    let w = state.svg_length_attr(w_attr.unwrap_or("200"), Axis::X)?;
    let h = state.svg_length_attr(h_attr.unwrap_or("200"), Axis::Y)?;

    let mut settings = state.settings.clone();
    let style = get_style_dict(node.attribute("style").unwrap_or(""));
    if let Some(fill) = style.get("fill") {
        settings.fg = parse_color(fill, "1.0", &state);
    }

    let halign = match node.attribute("text-anchor").unwrap_or("start") {
        "middle" => {
            x -= w / 2.0;
            HAlign::Center
        }
        "end" => {
            x -= w;
            HAlign::Right
        }
        _ => HAlign::Left,
    };
    let valign = match faint_attr(node, "valign").unwrap_or("top") {
        "middle" => VAlign::Middle,
        "bottom" => VAlign::Bottom,
        _ => VAlign::Top,
    };
    let default_bounded = if boxed { "1" } else { "0" };
    let bounded = faint_attr(node, "bounded").unwrap_or(default_bounded) == "1";

    let parsing = faint_attr(node, "parsing") == Some("1");
    let content = if parsing {
        raw_content(node).unwrap_or_default()
    } else {
        text_content(node)
    };

    let tri = tri_from_rect(Rect::new(x, y, w, h));
    let mut text = TextShape::new(tri, content, settings, state.font.clone());
    text.halign = halign;
    text.valign = valign;
    text.bounded = bounded;
    text.parsing = parsing;
    // The y attribute points at the first baseline; the editor box
    // starts one row above it.
    text.tri = state.transform_tri(tri.translated(0.0, -text.row_height()));
    Ok(Some(Shape::Text(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::models::{Paint, Rgba};
    use crate::parse::state::{FrameProps, IdTable};
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    const NS_DECL: &str = "xmlns='http://www.w3.org/2000/svg' \
                           xmlns:faint='http://www.code.google.com/p/faint-graphics-editor'";

    fn import_text(markup: &str) -> (TextShape, Vec<String>) {
        let doc = roxmltree::Document::parse(markup).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::new();
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let shape = parse_text(doc.root_element(), &state).unwrap().unwrap();
        match shape {
            Shape::Text(t) => (t, props.warnings()),
            other => panic!("not text: {:?}", other),
        }
    }

    #[test]
    fn tspans_with_hardbreaks_restore_line_breaks() {
        let (text, _) = import_text(&format!(
            "<text {} x='0' y='20'>\
               <tspan faint:hardbreak='1'>first</tspan>\
               <tspan>second</tspan>\
             </text>",
            NS_DECL
        ));
        assert_eq!(text.text, "first\nsecond");
    }

    #[test]
    fn baseline_moves_tri_one_row_up() {
        let (text, _) = import_text(&format!(
            "<text {} x='10' y='30' font-size='12'>hi</text>",
            NS_DECL
        ));
        assert_eq!(text.tri.p0(), Point::new(10.0, 18.0));
        assert_eq!(text.text, "hi");
    }

    #[test]
    fn unsized_text_defaults_unbounded() {
        let (text, _) = import_text(&format!("<text {} x='0' y='0'>t</text>", NS_DECL));
        assert!(!text.bounded);
        assert!((text.tri.width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn faint_extents_make_a_bounded_box() {
        let (text, _) = import_text(&format!(
            "<text {} x='0' y='10' faint:width='120' faint:height='40'>t</text>",
            NS_DECL
        ));
        assert!(text.bounded);
        assert!((text.tri.width() - 120.0).abs() < 1e-9);
        assert!((text.tri.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn middle_anchor_centers_the_box() {
        let (text, _) = import_text(&format!(
            "<text {} x='100' y='10' faint:width='50' faint:height='20' \
             text-anchor='middle'>t</text>",
            NS_DECL
        ));
        assert_eq!(text.halign, HAlign::Center);
        assert_eq!(text.tri.p0().x, 75.0);
    }

    #[test]
    fn end_anchor_right_aligns_the_box() {
        let (text, _) = import_text(&format!(
            "<text {} x='100' y='10' faint:width='50' faint:height='20' \
             text-anchor='end'>t</text>",
            NS_DECL
        ));
        assert_eq!(text.halign, HAlign::Right);
        assert_eq!(text.tri.p0().x, 50.0);
    }

    #[test]
    fn valign_attribute_parses() {
        let (text, _) = import_text(&format!(
            "<text {} x='0' y='0' faint:valign='bottom'>t</text>",
            NS_DECL
        ));
        assert_eq!(text.valign, VAlign::Bottom);
    }

    #[test]
    fn parsing_text_restores_raw_source() {
        let (text, _) = import_text(&format!(
            "<text {} x='0' y='0' faint:parsing='1'>\
               <tspan>evaluated: 4</tspan>\
               <faint:raw>evaluated: \\expr(2+2)</faint:raw>\
             </text>",
            NS_DECL
        ));
        assert!(text.parsing);
        assert_eq!(text.text, "evaluated: \\expr(2+2)");
    }

    #[test]
    fn style_fill_colors_the_text() {
        let (text, _) = import_text(&format!(
            "<text {} x='0' y='0' style='fill:rgb(7, 8, 9)'>t</text>",
            NS_DECL
        ));
        assert_eq!(text.style.fg, Paint::Color(Rgba::rgb(7, 8, 9)));
    }
}
