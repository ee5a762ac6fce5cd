//! Translating SVG stroke and fill attributes into paint styles.
//!
//! SVG keeps stroke and fill independent while the editor model uses
//! one fill mode with a foreground and background paint. The functions
//! here move between the two views.

use std::collections::HashMap;

use super::color::parse_color;
use super::grammar::extract_url_reference;
use super::state::ParseState;
use super::XmlNode;
use crate::models::{Arrow, FillMode, LineCap, LineJoin, PaintStyle};

/// Parses an SVG style attribute into a key/value map. Items without
/// exactly one colon are skipped.
pub fn get_style_dict(style: &str) -> HashMap<String, String> {
    let mut style_dict = HashMap::new();
    for item in style.split(';') {
        let parts: Vec<&str> = item.split(':').collect();
        if let [key, value] = parts[..] {
            style_dict.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    style_dict
}

pub fn to_faint_cap(svg_cap: &str) -> LineCap {
    match svg_cap {
        "round" => LineCap::Round,
        _ => LineCap::Flat,
    }
}

pub fn to_faint_join(svg_join: &str) -> Option<LineJoin> {
    match svg_join {
        "miter" => Some(LineJoin::Miter),
        "round" => Some(LineJoin::Round),
        "bevel" => Some(LineJoin::Bevel),
        _ => None,
    }
}

/// Adds the specified fill to the settings, preserving a border.
fn add_fill(settings: &mut PaintStyle, fill: &str, fill_opacity: &str, state: &ParseState) {
    if settings.fill_mode == FillMode::Border {
        settings.fill_mode = FillMode::BorderFill;
        settings.bg = parse_color(fill, fill_opacity, state);
    } else {
        settings.fill_mode = FillMode::Fill;
        settings.fg = parse_color(fill, fill_opacity, state);
    }
}

/// Adds the specified stroke to the settings, preserving a fill.
fn add_stroke(settings: &mut PaintStyle, stroke: &str, stroke_opacity: &str, state: &ParseState) {
    if settings.fill_mode == FillMode::Fill {
        settings.fill_mode = FillMode::BorderFill;
        settings.bg = settings.fg.clone();
        settings.fg = parse_color(stroke, stroke_opacity, state);
    } else {
        settings.fill_mode = FillMode::Border;
        settings.fg = parse_color(stroke, stroke_opacity, state);
    }
}

/// Removes the fill, preserving a border.
fn remove_fill(settings: &mut PaintStyle) {
    match settings.fill_mode {
        FillMode::Fill => settings.fill_mode = FillMode::None,
        FillMode::BorderFill => settings.fill_mode = FillMode::Border,
        _ => {}
    }
}

/// Removes the stroke, preserving a fill.
fn remove_stroke(settings: &mut PaintStyle) {
    match settings.fill_mode {
        FillMode::Border => settings.fill_mode = FillMode::None,
        FillMode::BorderFill => {
            settings.fg = settings.bg.clone();
            settings.fill_mode = FillMode::Fill;
        }
        _ => {}
    }
}

/// Converts SVG stroke and fill into the combined fill mode with
/// foreground and background paints. Absent attributes inherit.
pub fn fillstyle_to_settings(
    settings: &mut PaintStyle,
    stroke: Option<&str>,
    fill: Option<&str>,
    stroke_opacity: &str,
    fill_opacity: &str,
    state: &ParseState,
) {
    match (stroke, fill) {
        (None, None) => {}
        (None, Some("none")) => remove_fill(settings),
        (None, Some(fill)) => add_fill(settings, fill, fill_opacity, state),
        (Some("none"), None) => remove_stroke(settings),
        (Some(stroke), None) => add_stroke(settings, stroke, stroke_opacity, state),
        (Some("none"), Some("none")) => settings.fill_mode = FillMode::None,
        (Some("none"), Some(fill)) => {
            settings.fill_mode = FillMode::Fill;
            settings.fg = parse_color(fill, fill_opacity, state);
        }
        (Some(stroke), Some("none")) => {
            settings.fill_mode = FillMode::Border;
            settings.fg = parse_color(stroke, stroke_opacity, state);
        }
        (Some(stroke), Some(fill)) => {
            settings.fill_mode = FillMode::BorderFill;
            settings.fg = parse_color(stroke, stroke_opacity, state);
            settings.bg = parse_color(fill, fill_opacity, state);
        }
    }
}

fn references_marker(value: &str, prefix: &str) -> bool {
    extract_url_reference(value).map_or(false, |id| id.starts_with(prefix))
}

/// Reads the marker-start and marker-end attributes. Both absent means
/// no arrow, so markers never inherit.
pub fn parse_marker_attr(node: XmlNode, settings: &mut PaintStyle) {
    let front = node
        .attribute("marker-end")
        .map_or(false, |v| references_marker(v, "Arrowhead"));
    let back = node
        .attribute("marker-start")
        .map_or(false, |v| references_marker(v, "Arrowtail"));
    settings.arrow = match (front, back) {
        (true, true) => Arrow::Both,
        (true, false) => Arrow::Front,
        (false, true) => Arrow::Back,
        (false, false) => Arrow::None,
    };
}
