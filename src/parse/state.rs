//! Shared state for an SVG parse in progress.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use super::color::parse_color_noref;
use super::gradient;
use super::length::{self, Axis};
use super::style::{self, get_style_dict, to_faint_cap};
use super::transform::{apply_transforms, parse_transform_list};
use super::XmlNode;
use crate::error::LoadResult;
use crate::geom::{Matrix, Tri};
use crate::models::{Background, Calibration, FontStyle, LineStyle, Paint, PaintStyle, Rgba};

/// Collects what the parsed frame will contain besides shapes, along
/// with any load warnings. Shared read-only between parse states, so
/// the sinks use interior mutability.
pub struct FrameProps {
    width: u32,
    height: u32,
    warnings: RefCell<Vec<String>>,
    background: RefCell<Option<Background>>,
    calibration: RefCell<Option<Calibration>>,
}

impl FrameProps {
    pub fn new(width: u32, height: u32) -> Self {
        FrameProps {
            width,
            height,
            warnings: RefCell::new(Vec::new()),
            background: RefCell::new(None),
            calibration: RefCell::new(None),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn add_warning(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.borrow_mut().push(message);
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn set_background(&self, background: Background) {
        *self.background.borrow_mut() = Some(background);
    }

    pub fn take_background(&self) -> Option<Background> {
        self.background.borrow_mut().take()
    }

    pub fn set_calibration(&self, calibration: Calibration) {
        *self.calibration.borrow_mut() = Some(calibration);
    }

    pub fn take_calibration(&self) -> Option<Calibration> {
        self.calibration.borrow_mut().take()
    }
}

/// Every node with an id attribute, plus the paints already parsed
/// from such nodes. Referenced paints are parsed on demand, so a
/// shape may use a gradient defined later in the document.
#[derive(Default)]
pub struct IdTable<'a> {
    nodes: HashMap<String, XmlNode<'a>>,
    paints: RefCell<HashMap<String, Paint>>,
}

impl<'a> IdTable<'a> {
    pub fn new() -> Self {
        IdTable::default()
    }

    pub fn from_document(document: &'a roxmltree::Document<'a>) -> Self {
        let mut nodes = HashMap::new();
        for node in document.descendants() {
            if let Some(id) = node.attribute("id") {
                nodes.entry(id.to_string()).or_insert(node);
            }
        }
        IdTable {
            nodes,
            paints: RefCell::new(HashMap::new()),
        }
    }

    pub fn node(&self, id: &str) -> Option<XmlNode<'a>> {
        self.nodes.get(id).copied()
    }

    pub fn register_paint(&self, id: &str, paint: Paint) {
        self.paints.borrow_mut().insert(id.to_string(), paint);
    }

    pub fn cached_paint(&self, id: &str) -> Option<Paint> {
        self.paints.borrow().get(id).cloned()
    }
}

/// The state when arriving at a node: the inheritable settings from
/// above, the current transformation matrix and the frame props.
#[derive(Clone)]
pub struct ParseState<'a> {
    props: &'a FrameProps,
    ids: &'a IdTable<'a>,
    referenced: &'a RefCell<BTreeSet<String>>,
    pub ctm: Matrix,
    pub settings: PaintStyle,
    pub font: FontStyle,
    pub current_color: Rgba,
    pub container_size: (f64, f64),
    /// ISO 639-1 code used when evaluating switch elements.
    pub language: String,
}

impl<'a> ParseState<'a> {
    pub fn new(
        props: &'a FrameProps,
        ids: &'a IdTable<'a>,
        referenced: &'a RefCell<BTreeSet<String>>,
        language: &str,
    ) -> Self {
        ParseState {
            props,
            ids,
            referenced,
            ctm: Matrix::identity(),
            settings: PaintStyle::default(),
            font: FontStyle::default(),
            current_color: Rgba::rgb(255, 0, 0),
            container_size: (props.width() as f64, props.height() as f64),
            language: language.to_string(),
        }
    }

    pub fn props(&self) -> &'a FrameProps {
        self.props
    }

    pub fn ids(&self) -> &'a IdTable<'a> {
        self.ids
    }

    /// Records that the document referenced the id, whether or not it
    /// resolved. Referenced nodes are not independent shapes.
    pub fn note_reference(&self, id: &str) {
        self.referenced.borrow_mut().insert(id.to_string());
    }

    /// Finds the paint a url() reference points at, parsing the
    /// referenced gradient or pattern the first time it is needed.
    pub fn lookup_paint(&self, id: &str) -> Option<Paint> {
        if let Some(paint) = self.ids.cached_paint(id) {
            return Some(paint);
        }
        let node = self.ids.node(id)?;
        match gradient::parse_paint_node(node, self) {
            Ok(Some(paint)) => {
                self.ids.register_paint(id, paint.clone());
                Some(paint)
            }
            Ok(None) => None,
            Err(err) => {
                self.props.add_warning(err.to_string());
                None
            }
        }
    }

    fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.container_size.0,
            Axis::Y => self.container_size.1,
        }
    }

    pub fn svg_length_attr(&self, value_str: &str, axis: Axis) -> LoadResult<f64> {
        length::svg_length_attr_dumb(value_str, self.props, self.span(axis))
    }

    pub fn svg_coord_attr(&self, value_str: &str, axis: Axis) -> LoadResult<f64> {
        length::svg_coord_attr_dumb(value_str, self.props, self.span(axis))
    }

    /// The tri transformed by the current transformation matrix.
    pub fn transform_tri(&self, tri: Tri) -> Tri {
        tri.transformed(&self.ctm)
    }

    /// Returns a new state updated by the node's transform, color and
    /// styling attributes, for recursing into the node.
    pub fn updated(&self, node: XmlNode) -> LoadResult<ParseState<'a>> {
        let transforms = parse_transform_list(node.attribute("transform").unwrap_or(""))?;
        let mut next = self.clone();
        next.ctm = apply_transforms(&transforms, &self.ctm);
        if let Some(color_attr) = node.attribute("color") {
            next.current_color = parse_color_noref(color_attr, 1.0, self);
        }
        let (settings, font) = next.merged_settings(node)?;
        next.settings = settings;
        next.font = font;
        Ok(next)
    }

    /// Merges the node's inline style and presentation attributes into
    /// the inherited settings. Presentation attributes win.
    fn merged_settings(&self, node: XmlNode) -> LoadResult<(PaintStyle, FontStyle)> {
        let mut settings = self.settings.clone();
        let mut font = self.font.clone();

        let mut attributes = get_style_dict(node.attribute("style").unwrap_or(""));
        for attribute in node.attributes() {
            attributes.insert(attribute.name().to_string(), attribute.value().to_string());
        }

        let stroke_opacity = attributes
            .get("stroke-opacity")
            .map(String::as_str)
            .unwrap_or("1.0");
        let fill_opacity = attributes
            .get("fill-opacity")
            .map(String::as_str)
            .unwrap_or("1.0");
        let stroke = attributes.get("stroke").map(String::as_str);
        let fill = attributes.get("fill").map(String::as_str);
        style::fillstyle_to_settings(
            &mut settings,
            stroke,
            fill,
            stroke_opacity,
            fill_opacity,
            self,
        );

        match attributes.get("stroke-width").map(String::as_str) {
            None | Some("inherit") => {}
            Some(value) => {
                let width = self.svg_length_attr(value, Axis::X)? * self.ctm.a;
                if width < 0.0 {
                    self.props.add_warning(format!("Invalid stroke-width: {}", value));
                } else {
                    settings.line_width = width;
                }
            }
        }

        if let Some(dash) = attributes.get("stroke-dasharray") {
            settings.line_style = if dash == "none" {
                LineStyle::Solid
            } else {
                LineStyle::LongDash
            };
        }

        match attributes.get("stroke-linejoin").map(String::as_str) {
            None | Some("inherit") => {}
            Some(value) => match style::to_faint_join(value) {
                Some(join) => settings.join = join,
                None => self
                    .props
                    .add_warning(format!("Unsupported stroke-linejoin: {}", value)),
            },
        }

        if let Some(cap) = attributes.get("stroke-linecap") {
            settings.cap = to_faint_cap(cap);
        }

        match attributes.get("font-size").map(String::as_str) {
            None | Some("inherit") => {}
            Some("medium") => font.size = 12.0,
            Some(value) => font.size = self.svg_length_attr(value, Axis::X)?,
        }

        if let Some(family) = attributes.get("font-family") {
            font.family = family.clone();
        }
        if let Some(font_style) = attributes.get("font-style") {
            font.italic = font_style == "italic";
        }
        if let Some(weight) = attributes.get("font-weight") {
            font.bold = weight == "bold";
        }

        style::parse_marker_attr(node, &mut settings);
        Ok((settings, font))
    }
}
