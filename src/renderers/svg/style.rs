//! Style-attribute strings.
//!
//! The inverse of the import-side style merge: model paints and line
//! settings become `key:value;` lists, sorted by key so output is stable.

use crate::models::{LineCap, LineJoin, LineStyle, Paint, PaintStyle, Rgba};

use super::defs::SvgBuildState;

/// Formats a float attribute value: plain decimal, with a trailing
/// `.0` on whole numbers.
pub fn format_float(value: f64) -> String {
    if value == value.trunc() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Joins key/value pairs into a style attribute, sorted by key.
pub fn to_style(mut entries: Vec<(&'static str, String)>) -> String {
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let mut style = String::new();
    for (key, value) in entries {
        style.push_str(key);
        style.push(':');
        style.push_str(&value);
        style.push(';');
    }
    style
}

pub fn to_rgb_color(color: Rgba) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

pub(super) fn color_opacity(color: Rgba) -> String {
    if color.a == 255 {
        "1.0".to_string()
    } else {
        format_float(f64::from(color.a) / 255.0)
    }
}

/// The opacity written next to a fill or stroke entry. Gradients and
/// patterns carry alpha in their stops, so they read as opaque here.
pub fn to_opacity_str(paint: &Paint) -> String {
    match paint {
        Paint::Color(color) => color_opacity(*color),
        _ => "1.0".to_string(),
    }
}

/// A fill/stroke value: an inline rgb() color, or a reference to the
/// def the build state registered for a gradient or pattern.
pub fn to_svg_color(paint: &Paint, state: &mut SvgBuildState) -> String {
    match paint {
        Paint::Color(color) => to_rgb_color(*color),
        linked => match state.get_defs_id(linked) {
            Some(id) => format!("url(#{})", id),
            None => "none".to_string(),
        },
    }
}

pub fn to_svg_cap(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Flat => "butt",
        LineCap::Round => "round",
    }
}

fn to_svg_join(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

/// Style entries for an outlined and/or filled shape.
pub fn svg_fill_style(style: &PaintStyle, state: &mut SvgBuildState) -> String {
    use crate::models::FillMode;

    match style.fill_mode {
        FillMode::Border => to_style(vec![
            ("fill", "none".to_string()),
            ("stroke-width", format_float(style.line_width)),
            ("stroke", to_svg_color(&style.fg, state)),
            ("stroke-opacity", to_opacity_str(&style.fg)),
        ]),
        FillMode::Fill => to_style(vec![
            ("stroke", "none".to_string()),
            ("fill", to_svg_color(&style.fg, state)),
            ("fill-opacity", to_opacity_str(&style.fg)),
        ]),
        FillMode::BorderFill => to_style(vec![
            ("stroke", to_svg_color(&style.fg, state)),
            ("stroke-width", format_float(style.line_width)),
            ("fill", to_svg_color(&style.bg, state)),
            ("fill-opacity", to_opacity_str(&style.bg)),
            ("stroke-opacity", to_opacity_str(&style.fg)),
        ]),
        FillMode::None => to_style(vec![
            ("stroke", "none".to_string()),
            ("fill", "none".to_string()),
        ]),
    }
}

/// Style entries for a stroked line: color, width, opacity and cap.
pub fn svg_line_style(style: &PaintStyle, state: &mut SvgBuildState) -> String {
    to_style(vec![
        ("stroke", to_svg_color(&style.fg, state)),
        ("stroke-width", format_float(style.line_width)),
        ("stroke-opacity", to_opacity_str(&style.fg)),
        ("stroke-linecap", to_svg_cap(style.cap).to_string()),
    ])
}

/// The dash entry for long-dashed lines. Dash and gap are both twice
/// the line width.
pub fn svg_line_dash_style(style: &PaintStyle) -> String {
    if style.line_style == LineStyle::LongDash {
        let dash = (style.line_width * 2.0) as i64;
        format!("stroke-dasharray:{},{};", dash, dash)
    } else {
        String::new()
    }
}

pub fn svg_line_join_style(style: &PaintStyle) -> String {
    format!("stroke-linejoin:{};", to_svg_join(style.join))
}

pub fn svg_no_fill() -> &'static str {
    "fill:none;"
}
