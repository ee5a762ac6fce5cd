//! Entry points for reading SVG documents.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use roxmltree::ParsingOptions;

use super::length::svg_length_attr_dumb;
use super::shapes::parse_content_node;
use super::state::{FrameProps, IdTable, ParseState};
use super::{is_svg_element, XmlNode};
use crate::error::{LoadError, LoadResult};
use crate::geom::Matrix;
use crate::models::Document;

/// What a parse recorded besides the document content.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Ids referenced through url() or xlink:href attributes, whether
    /// or not they resolved. Tells callers which defs entries were
    /// actually used.
    pub referenced_ids: BTreeSet<String>,
}

/// Reads SVG markup and appends the image it describes to `image` as a
/// new frame. `language` is the ISO 639-1 code used to evaluate switch
/// alternatives.
pub fn parse_svg_string(
    markup: &str,
    image: &mut Document,
    language: &str,
) -> LoadResult<ParseOutcome> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(markup, options).map_err(|err| match err {
        roxmltree::Error::NodesLimitReached
        | roxmltree::Error::AttributesLimitReached
        | roxmltree::Error::NamespacesLimitReached => LoadError::Xml(err),
        other => LoadError::Markup(other.to_string()),
    })?;
    let root = xml.root_element();
    if !is_svg_element(root, "svg") {
        return Err(LoadError::NotSvg);
    }
    parse_svg_root_node(root, &xml, image, language)
}

/// Reads an SVG file; see `parse_svg_string`.
pub fn parse_svg_file(
    path: impl AsRef<Path>,
    image: &mut Document,
    language: &str,
) -> LoadResult<ParseOutcome> {
    let markup = fs::read_to_string(path)?;
    parse_svg_string(&markup, image, language)
}

/// The viewBox attribute: the origin, plus the span strings which
/// double as the default width and height.
fn get_viewbox(node: XmlNode) -> LoadResult<(f64, f64, &str, &str)> {
    let view_box = node.attribute("viewBox").unwrap_or("0 0 640 480");
    let bad = || LoadError::Markup(format!("invalid viewBox: {}", view_box));
    let parts: Vec<&str> = view_box.split(' ').collect();
    if parts.len() != 4 {
        return Err(bad());
    }
    let x0: f64 = parts[0].parse().map_err(|_| bad())?;
    let y0: f64 = parts[1].parse().map_err(|_| bad())?;
    Ok((x0, y0, parts[2], parts[3]))
}

/// Frame size from the svg node, defaulting to the viewBox span, which
/// is also what percentages resolve against. Warnings raised here
/// belong to the document rather than the frame.
fn svg_size(node: XmlNode, w_default: &str, h_default: &str) -> LoadResult<(u32, u32, Vec<String>)> {
    let w_span: f64 = w_default
        .parse()
        .map_err(|_| LoadError::InvalidLength(w_default.to_string()))?;
    let h_span: f64 = h_default
        .parse()
        .map_err(|_| LoadError::InvalidLength(h_default.to_string()))?;

    let sink = FrameProps::new(0, 0);
    let w = svg_length_attr_dumb(node.attribute("width").unwrap_or(w_default), &sink, w_span)?;
    let h = svg_length_attr_dumb(node.attribute("height").unwrap_or(h_default), &sink, h_span)?;
    let (w, h) = (w.round(), h.round());
    if w <= 0.0 || h <= 0.0 {
        return Err(LoadError::InvalidSize(w, h));
    }
    Ok((w as u32, h as u32, sink.warnings()))
}

fn parse_svg_root_node(
    svg_node: XmlNode,
    xml: &roxmltree::Document,
    image: &mut Document,
    language: &str,
) -> LoadResult<ParseOutcome> {
    let (x0, y0, w_default, h_default) = get_viewbox(svg_node)?;
    let (width, height, size_warnings) = svg_size(svg_node, w_default, h_default)?;

    let props = FrameProps::new(width, height);
    let ids = IdTable::from_document(xml);
    let referenced = RefCell::new(BTreeSet::new());
    let mut state = ParseState::new(&props, &ids, &referenced, language);
    if x0 != 0.0 || y0 != 0.0 {
        state.ctm = Matrix::translation(-x0, -y0).multiply(&state.ctm);
    }

    let mut shapes = Vec::new();
    for child in svg_node.children().filter(|c| c.is_element()) {
        parse_content_node(child, &state, &mut shapes)?;
    }

    let frame = image.add_frame(width, height);
    frame.shapes = shapes;
    if let Some(background) = props.take_background() {
        frame.set_background(background);
    }
    if let Some(calibration) = props.take_calibration() {
        frame.set_calibration(calibration);
    }
    for warning in size_warnings.into_iter().chain(props.warnings()) {
        image.add_warning(warning);
    }
    Ok(ParseOutcome {
        referenced_ids: referenced.into_inner(),
    })
}
