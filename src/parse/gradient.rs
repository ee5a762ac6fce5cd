//! Parsing gradient, pattern and calibration definitions.

use std::collections::HashSet;

use super::color::{parse_color_noref, parse_opacity};
use super::grammar::{extract_local_href, parse_embedded_image_data, parse_stop_offset};
use super::length::Axis;
use super::state::ParseState;
use super::style::get_style_dict;
use super::{is_svg_element, xlink_attr, XmlNode};
use crate::error::{LoadError, LoadResult};
use crate::geom::Point;
use crate::models::{
    Calibration, ColorStop, EmbeddedImage, ImageFormat, LinearGradient, Paint, Pattern,
    RadialGradient, Rgba,
};

/// Parses the referenced node if it defines a paint. Used to resolve
/// url() references to definitions that appear later in the document.
pub fn parse_paint_node(node: XmlNode, state: &ParseState) -> LoadResult<Option<Paint>> {
    let parsed = if is_svg_element(node, "linearGradient") {
        parse_linear_gradient_node(node, state)?
    } else if is_svg_element(node, "radialGradient") {
        parse_radial_gradient_node(node, state)?
    } else if is_svg_element(node, "pattern") {
        parse_pattern_node(node, state)?
    } else {
        None
    };
    Ok(parsed.map(|(_, paint)| paint))
}

/// Parses the stop children of a gradient node into offset/color pairs.
fn parse_color_stops(node: XmlNode, state: &ParseState) -> LoadResult<Vec<ColorStop>> {
    let mut stops = Vec::new();
    for stop in node.children().filter(|ch| is_svg_element(*ch, "stop")) {
        let style_dict = get_style_dict(stop.attribute("style").unwrap_or(""));
        let mut color_str = style_dict.get("stop-color").map(String::as_str);
        let mut opacity_str = style_dict
            .get("stop-opacity")
            .map(String::as_str)
            .unwrap_or("1.0");
        if let Some(attr) = stop.attribute("stop-color") {
            color_str = Some(attr);
        }
        if let Some(attr) = stop.attribute("stop-opacity") {
            opacity_str = attr;
        }

        let offset = parse_stop_offset(stop.attribute("offset").unwrap_or("0"))?;
        let opacity = parse_opacity(opacity_str, state.props());
        let color = match color_str {
            Some(color_str) => parse_color_noref(color_str, opacity, state),
            None => Rgba::black().faded(opacity),
        };
        stops.push(ColorStop::new(offset, color));
    }
    Ok(stops)
}

fn href_attr<'a>(node: XmlNode<'a>) -> Option<&'a str> {
    xlink_attr(node, "href").or_else(|| node.attribute("href"))
}

fn paint_stops(paint: &Paint) -> Option<Vec<ColorStop>> {
    match paint {
        Paint::LinearGradient(gradient) => Some(gradient.stops.clone()),
        Paint::RadialGradient(gradient) => Some(gradient.stops.clone()),
        _ => None,
    }
}

/// Returns the color stops of the gradient an href points at, parsing
/// the target if it has not been parsed yet.
fn linked_stops(
    href: &str,
    state: &ParseState,
    visited: &mut HashSet<String>,
) -> LoadResult<Vec<ColorStop>> {
    let not_found = |id: &str| {
        // Trailing space kept for warning-text compatibility.
        state
            .props()
            .add_warning(format!("Referenced gradient not found: {} ", id));
    };

    let ref_id = match extract_local_href(href) {
        Some(ref_id) => ref_id,
        None => {
            not_found(href);
            return Ok(Vec::new());
        }
    };

    if let Some(paint) = state.ids().cached_paint(ref_id) {
        if let Some(stops) = paint_stops(&paint) {
            return Ok(stops);
        }
        not_found(ref_id);
        return Ok(Vec::new());
    }

    let linked = match state.ids().node(ref_id) {
        Some(other) if is_svg_element(other, "linearGradient") => {
            parse_linear_gradient_impl(other, state, visited)?
        }
        Some(other) if is_svg_element(other, "radialGradient") => {
            parse_radial_gradient_impl(other, state, visited)?
        }
        _ => None,
    };

    match linked {
        Some((id, paint)) => {
            let stops = paint_stops(&paint).unwrap_or_default();
            state.ids().register_paint(&id, paint);
            Ok(stops)
        }
        None => {
            not_found(ref_id);
            Ok(Vec::new())
        }
    }
}

/// Parses a linearGradient element. Gradients without an id are
/// ignored since nothing can refer to them.
pub fn parse_linear_gradient_node(
    node: XmlNode,
    state: &ParseState,
) -> LoadResult<Option<(String, Paint)>> {
    let mut visited = HashSet::new();
    parse_linear_gradient_impl(node, state, &mut visited)
}

fn parse_linear_gradient_impl(
    node: XmlNode,
    state: &ParseState,
    visited: &mut HashSet<String>,
) -> LoadResult<Option<(String, Paint)>> {
    let state = state.updated(node)?;
    let node_id = match node.attribute("id") {
        Some(node_id) => node_id,
        None => return Ok(None),
    };
    if !visited.insert(node_id.to_string()) {
        return Err(LoadError::GradientCycle(node_id.to_string()));
    }

    let x1 = state.svg_coord_attr(node.attribute("x1").unwrap_or("0.0"), Axis::X)?;
    let x2 = state.svg_coord_attr(node.attribute("x2").unwrap_or("0.0"), Axis::X)?;
    let y1 = state.svg_coord_attr(node.attribute("y1").unwrap_or("0.0"), Axis::Y)?;
    let y2 = state.svg_coord_attr(node.attribute("y2").unwrap_or("0.0"), Axis::Y)?;
    let angle = (y2 - y1).atan2(x2 - x1);

    let mut stops = parse_color_stops(node, &state)?;
    if stops.is_empty() {
        if let Some(href) = href_attr(node) {
            stops = linked_stops(href, &state, visited)?;
        }
        if stops.is_empty() {
            state.props().add_warning(format!(
                "linearGradient with id={} has no color-stops",
                node_id
            ));
            return Ok(None);
        }
    }

    Ok(Some((
        node_id.to_string(),
        Paint::LinearGradient(LinearGradient::new(angle, stops)),
    )))
}

/// Parses a radialGradient element. Only the stops carry over, the
/// gradient geometry stays centered.
pub fn parse_radial_gradient_node(
    node: XmlNode,
    state: &ParseState,
) -> LoadResult<Option<(String, Paint)>> {
    let mut visited = HashSet::new();
    parse_radial_gradient_impl(node, state, &mut visited)
}

fn parse_radial_gradient_impl(
    node: XmlNode,
    state: &ParseState,
    visited: &mut HashSet<String>,
) -> LoadResult<Option<(String, Paint)>> {
    let state = state.updated(node)?;
    let node_id = match node.attribute("id") {
        Some(node_id) => node_id,
        None => return Ok(None),
    };
    if !visited.insert(node_id.to_string()) {
        return Err(LoadError::GradientCycle(node_id.to_string()));
    }

    let mut stops = parse_color_stops(node, &state)?;
    if stops.is_empty() {
        if let Some(href) = href_attr(node) {
            stops = linked_stops(href, &state, visited)?;
        }
        if stops.is_empty() {
            state.props().add_warning(format!(
                "radialGradient with id={} has no color-stops",
                node_id
            ));
            return Ok(None);
        }
    }

    Ok(Some((
        node_id.to_string(),
        Paint::RadialGradient(RadialGradient::from_stops(stops)),
    )))
}

/// Parses a pattern element into a raster tile paint. Only embedded
/// PNG images are supported as tiles.
pub fn parse_pattern_node(
    node: XmlNode,
    state: &ParseState,
) -> LoadResult<Option<(String, Paint)>> {
    let state = state.updated(node)?;
    let node_id = match node.attribute("id") {
        Some(node_id) => node_id,
        None => return Ok(None),
    };

    for child in node.children() {
        if !is_svg_element(child, "image") {
            continue;
        }
        if let Some((ImageFormat::Png, data)) =
            xlink_attr(child, "href").and_then(parse_embedded_image_data)
        {
            let pattern = Pattern {
                tile: EmbeddedImage::png(data),
                object_aligned: !node.has_attribute("patternUnits"),
            };
            return Ok(Some((node_id.to_string(), Paint::Pattern(pattern))));
        }
    }
    state
        .props()
        .add_warning(format!("Failed parsing pattern with id={}", node_id));
    Ok(None)
}

/// Parses a faint:calibration element defining the image's physical
/// scale.
pub fn parse_faint_calibration(node: XmlNode, state: &ParseState) -> LoadResult<()> {
    let x1 = state.svg_coord_attr(node.attribute("x1").unwrap_or("0"), Axis::X)?;
    let y1 = state.svg_coord_attr(node.attribute("y1").unwrap_or("0"), Axis::Y)?;
    let x2 = state.svg_coord_attr(node.attribute("x2").unwrap_or("0"), Axis::X)?;
    let y2 = state.svg_coord_attr(node.attribute("y2").unwrap_or("0"), Axis::Y)?;
    let length = state.svg_length_attr(node.attribute("length").unwrap_or(""), Axis::X)?;
    let unit = node.attribute("unit").unwrap_or("").to_string();

    state.props().set_calibration(Calibration {
        start: Point::new(x1, y1),
        end: Point::new(x2, y2),
        length,
        unit,
    });
    Ok(())
}
