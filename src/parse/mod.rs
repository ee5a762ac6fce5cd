//! SVG import: builds a `Document` from SVG 1.1 markup.
//!
//! The entry points live in `document` (`parse_svg_string`,
//! `parse_svg_file`); the remaining modules are the layers underneath:
//! lexical helpers, attribute parsers, the inherited parse state and the
//! per-element importers.

pub mod color;
pub mod document;
pub mod gradient;
pub mod grammar;
pub mod length;
pub mod pathdata;
pub mod shapes;
pub mod state;
pub mod style;
pub mod text;
pub mod transform;

// Re-export the import API
pub use document::*;
pub use state::{FrameProps, ParseState};

/// XML namespaces recognized by the importer.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const FAINT_NS: &str = "http://www.code.google.com/p/faint-graphics-editor";

/// Shorthand for the nodes handed around during one parse.
pub(crate) type XmlNode<'a> = roxmltree::Node<'a, 'a>;

/// A `faint:`-namespaced attribute.
pub(crate) fn faint_attr<'a>(node: XmlNode<'a>, name: &str) -> Option<&'a str> {
    node.attribute((FAINT_NS, name))
}

/// An `xlink:`-namespaced attribute.
pub(crate) fn xlink_attr<'a>(node: XmlNode<'a>, name: &str) -> Option<&'a str> {
    node.attribute((XLINK_NS, name))
}

/// True if the node is `name` in the SVG namespace.
pub(crate) fn is_svg_element(node: XmlNode, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(SVG_NS)
        && node.tag_name().name() == name
}

/// True if the node is `name` in the faint namespace.
pub(crate) fn is_faint_element(node: XmlNode, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(FAINT_NS)
        && node.tag_name().name() == name
}

/// True if the node carries `faint:type` with the given value, marking
/// an SVG shape that round-trips as a specific editor object.
pub(crate) fn is_faint_type(node: XmlNode, expected: &str) -> bool {
    faint_attr(node, "type") == Some(expected)
}
