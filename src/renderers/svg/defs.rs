//! Deferred `<defs>` content.
//!
//! Gradient, pattern and marker defs are not written where they are
//! used; the build state collects them during the shape walk and the
//! `<defs>` block is emitted afterwards with stable, deduplicated ids.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::models::{
    Calibration, ColorStop, EmbeddedImage, LinearGradient, Paint, Pattern, RadialGradient, Rgba,
};

use super::style::{color_opacity, format_float, to_rgb_color, to_style};
use super::tree::SvgElement;

/// How far an arrowed line end is pulled back from the true tip, so
/// the marker triangle covers the gap. The import side extends line
/// ends by the same amount.
pub fn arrow_back_off(line_width: f64) -> f64 {
    6.0 * line_width / 2.0 + line_width
}

/// Marker flavors for arrowed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Head,
    Tail,
}

fn marker_name(kind: MarkerKind, index: usize) -> String {
    let prefix = match kind {
        MarkerKind::Head => "Arrowhead",
        MarkerKind::Tail => "Arrowtail",
    };
    if index == 0 {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, index + 1)
    }
}

fn dedup_index<T: PartialEq + Clone>(items: &mut Vec<T>, item: &T) -> usize {
    match items.iter().position(|existing| existing == item) {
        Some(index) => index,
        None => {
            items.push(item.clone());
            items.len() - 1
        }
    }
}

/// Tracks the defs generated while the shape tree is built.
#[derive(Debug, Default)]
pub struct SvgBuildState {
    linear_gradients: Vec<LinearGradient>,
    patterns: Vec<Pattern>,
    radial_gradients: Vec<RadialGradient>,
    head_colors: Vec<Rgba>,
    tail_colors: Vec<Rgba>,
}

impl SvgBuildState {
    pub fn new() -> Self {
        SvgBuildState::default()
    }

    /// True if the paint is written as a defs reference rather than
    /// inline.
    pub fn should_link(&self, paint: &Paint) -> bool {
        !paint.is_color()
    }

    /// The defs id for a gradient or pattern paint, registering it on
    /// first use. Equal values share one def; ids number from 1 within
    /// each kind. Plain colors have no id.
    pub fn get_defs_id(&mut self, paint: &Paint) -> Option<String> {
        match paint {
            Paint::LinearGradient(gradient) => Some(format!(
                "lgradient{}",
                dedup_index(&mut self.linear_gradients, gradient) + 1
            )),
            Paint::RadialGradient(gradient) => Some(format!(
                "rgradient{}",
                dedup_index(&mut self.radial_gradients, gradient) + 1
            )),
            Paint::Pattern(pattern) => Some(format!(
                "pattern{}",
                dedup_index(&mut self.patterns, pattern) + 1
            )),
            Paint::Color(_) => None,
        }
    }

    /// The marker id for an arrow of the given kind and stroke color.
    /// The first color of each kind gets the bare prefix id, later
    /// colors get numbered variants.
    pub fn marker_id(&mut self, kind: MarkerKind, color: Rgba) -> String {
        let colors = match kind {
            MarkerKind::Head => &mut self.head_colors,
            MarkerKind::Tail => &mut self.tail_colors,
        };
        marker_name(kind, dedup_index(colors, &color))
    }

    /// Builds the `<defs>` element from everything registered during
    /// the walk, plus the frame calibration if there is one. Content
    /// order: linear gradients, patterns, radial gradients, markers,
    /// calibration.
    pub fn into_defs(self, calibration: Option<&Calibration>) -> SvgElement {
        let mut defs = SvgElement::new("defs");
        for (index, gradient) in self.linear_gradients.iter().enumerate() {
            defs.append(linear_gradient_element(
                &format!("lgradient{}", index + 1),
                gradient,
            ));
        }
        for (index, pattern) in self.patterns.iter().enumerate() {
            defs.append(pattern_element(&format!("pattern{}", index + 1), pattern));
        }
        for (index, gradient) in self.radial_gradients.iter().enumerate() {
            defs.append(radial_gradient_element(
                &format!("rgradient{}", index + 1),
                gradient,
            ));
        }
        for (index, color) in self.head_colors.iter().enumerate() {
            defs.append(marker_element(MarkerKind::Head, index, *color));
        }
        for (index, color) in self.tail_colors.iter().enumerate() {
            defs.append(marker_element(MarkerKind::Tail, index, *color));
        }
        if let Some(calibration) = calibration {
            defs.append(calibration_element(calibration));
        }
        defs
    }
}

/// Encodes an embedded image as a base64 data URI.
pub(crate) fn image_data_uri(image: &EmbeddedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.format.media_type(),
        BASE64.encode(&image.data)
    )
}

/// Reads the pixel size from a PNG IHDR header. Tiles are carried as
/// encoded bytes, so the size is sniffed rather than decoded.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    if data.len() < 24 || data[..8] != SIGNATURE || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn stop_element(stop: &ColorStop) -> SvgElement {
    let mut element = SvgElement::new("stop");
    element.set("offset", format!("{}%", (stop.offset * 100.0) as i64));
    element.set(
        "style",
        to_style(vec![
            ("stop-color", to_rgb_color(stop.color)),
            ("stop-opacity", color_opacity(stop.color)),
        ]),
    );
    element
}

fn linear_gradient_element(id: &str, gradient: &LinearGradient) -> SvgElement {
    let mut element = SvgElement::new("linearGradient");
    element.set("id", id);
    if gradient.angle == 0.0 {
        element.set("x1", "0");
        element.set("y1", "0");
        element.set("x2", "1");
        element.set("y2", "0");
    } else {
        // Direction vector for the angle; negative components move to
        // the 1-end so all four values stay in the unit box.
        let (mut x1, mut x2) = (0.0, gradient.angle.cos());
        if x2 < 0.0 {
            x1 = -x2;
            x2 = 0.0;
        }
        let (mut y1, mut y2) = (0.0, gradient.angle.sin());
        if y2 < 0.0 {
            y1 = -y2;
            y2 = 0.0;
        }
        element.set("x1", format_float(x1));
        element.set("y1", format_float(y1));
        element.set("x2", format_float(x2));
        element.set("y2", format_float(y2));
    }
    for stop in gradient.sorted_stops() {
        element.append(stop_element(&stop));
    }
    element
}

fn radial_gradient_element(id: &str, gradient: &RadialGradient) -> SvgElement {
    let mut element = SvgElement::new("radialGradient");
    element.set("id", id);
    element.set("cx", format_float(gradient.center.x));
    element.set("cy", format_float(gradient.center.y));
    element.set("rx", format_float(gradient.radii.0));
    element.set("ry", format_float(gradient.radii.1));
    for stop in gradient.sorted_stops() {
        element.append(stop_element(&stop));
    }
    element
}

fn pattern_element(id: &str, pattern: &Pattern) -> SvgElement {
    let mut element = SvgElement::new("pattern");
    element.set("id", id);
    element.set("x", "0");
    element.set("y", "0");
    let size = png_dimensions(&pattern.tile.data);
    if let Some((width, height)) = size {
        element.set("width", width.to_string());
        element.set("height", height.to_string());
    }
    if !pattern.object_aligned {
        element.set("patternUnits", "userSpaceOnUse");
        element.set("patternContentUnits", "userSpaceOnUse");
    }
    let mut image = SvgElement::new("image");
    if let Some((width, height)) = size {
        image.set("width", width.to_string());
        image.set("height", height.to_string());
    }
    image.set("xlink:href", image_data_uri(&pattern.tile));
    element.append(image);
    element
}

/// An arrow marker sized in stroke widths. The triangle reaches past
/// the written line end by `arrow_back_off`.
fn marker_element(kind: MarkerKind, index: usize, color: Rgba) -> SvgElement {
    let mut element = SvgElement::new("marker");
    element.set("id", marker_name(kind, index));
    element.set("markerUnits", "strokeWidth");
    element.set("markerWidth", "6");
    element.set("markerHeight", "5");
    let (ref_x, triangle) = match kind {
        MarkerKind::Head => ("2", "M 0 0 L 6 2.5 L 0 5 z"),
        MarkerKind::Tail => ("0", "M 6 0 L 0 2.5 L 6 5 z"),
    };
    element.set("refX", ref_x);
    element.set("refY", "2.5");
    element.set("orient", "auto");
    let mut path = SvgElement::new("path");
    path.set("d", triangle);
    path.set("style", to_style(vec![("fill", to_rgb_color(color))]));
    element.append(path);
    element
}

fn calibration_element(calibration: &Calibration) -> SvgElement {
    let mut element = SvgElement::new("faint:calibration");
    element.set("x1", format_float(calibration.start.x));
    element.set("y1", format_float(calibration.start.y));
    element.set("x2", format_float(calibration.end.x));
    element.set("y2", format_float(calibration.end.y));
    element.set("length", format_float(calibration.length));
    element.set("unit", calibration.unit.clone());
    element
}
