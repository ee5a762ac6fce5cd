//! Per-element shape importers.
//!
//! Each importer derives an updated parse state from the node's own
//! transform and styling attributes, builds the shape in user space and
//! maps it through the current transformation matrix exactly once. One
//! shared dispatcher routes rendered content, so the svg root, groups
//! and evaluated switch children all accept the same elements.

use super::color::{parse_color, parse_color_noref};
use super::gradient;
use super::grammar::{maybe_id_ref, pair_points, parse_embedded_image_data, parse_points};
use super::length::Axis;
use super::pathdata::parse_path_data;
use super::state::ParseState;
use super::text::parse_text;
use super::{faint_attr, is_faint_element, is_faint_type, is_svg_element, xlink_attr, XmlNode};
use crate::error::{LoadError, LoadResult};
use crate::geom::{
    self, center_based_rect, mid_point, tri_from_points, tri_from_rect, Point, Rect, Tri,
};
use crate::models::{
    Arrow, Background, EllipseShape, EmbeddedImage, GroupShape, ImageFormat, LineShape, Paint,
    PathSegment, PathShape, PolygonShape, PolylineShape, RasterShape, RectShape, Shape,
    SplineShape,
};
use crate::renderers::svg::defs::arrow_back_off;

/// Feature strings accepted in requiredFeatures attributes on switch
/// children.
const SUPPORTED_SVG_FEATURES: [&str; 21] = [
    "http://www.w3.org/TR/SVG11/feature#SVG",
    "http://www.w3.org/TR/SVG11/feature#SVGDOM",
    "http://www.w3.org/TR/SVG11/feature#SVG-static",
    "http://www.w3.org/TR/SVG11/feature#SVGDOM-static",
    "http://www.w3.org/TR/SVG11/feature#Structure",
    "http://www.w3.org/TR/SVG11/feature#BasicStructure",
    "http://www.w3.org/TR/SVG11/feature#ConditionalProcessing",
    "http://www.w3.org/TR/SVG11/feature#Image",
    "http://www.w3.org/TR/SVG11/feature#Style",
    "http://www.w3.org/TR/SVG11/feature#Shape",
    "http://www.w3.org/TR/SVG11/feature#Text",
    "http://www.w3.org/TR/SVG11/feature#BasicText",
    "http://www.w3.org/TR/SVG11/feature#PaintAttribute",
    "http://www.w3.org/TR/SVG11/feature#BasicPaintAttribute",
    "http://www.w3.org/TR/SVG11/feature#OpacityAttribute",
    "http://www.w3.org/TR/SVG11/feature#GraphicsAttribute",
    "http://www.w3.org/TR/SVG11/feature#BasicGraphicsAttribute",
    "http://www.w3.org/TR/SVG11/feature#Gradient",
    "http://www.w3.org/TR/SVG11/feature#XlinkAttribute",
    "http://www.w3.org/TR/SVG11/feature#Font",
    "http://www.w3.org/TR/SVG11/feature#BasicFont",
];

const PRODUCER_ELEMENTS: [&str; 11] = [
    "circle", "ellipse", "g", "image", "line", "path", "polygon", "polyline", "rect", "switch",
    "text",
];

/// True for element kinds that normally import as a shape. These are
/// also the candidate children evaluated inside a switch.
fn is_producer(node: XmlNode) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(super::SVG_NS)
        && PRODUCER_ELEMENTS.contains(&node.tag_name().name())
}

/// Imports one content node. Shapes are appended to `shapes` with
/// their id as name; gradients, patterns, defs and background markers
/// are handled through the state instead. Returns whether the node
/// produced a shape.
pub fn parse_content_node(
    node: XmlNode,
    state: &ParseState,
    shapes: &mut Vec<Shape>,
) -> LoadResult<bool> {
    let shape = if is_svg_element(node, "rect") {
        parse_rect_element(node, state)?
    } else if is_svg_element(node, "circle") {
        parse_circle(node, state)?
    } else if is_svg_element(node, "ellipse") {
        parse_ellipse(node, state)?
    } else if is_svg_element(node, "line") {
        parse_line(node, state)?
    } else if is_svg_element(node, "path") {
        parse_path_element(node, state)?
    } else if is_svg_element(node, "polygon") {
        parse_polygon_element(node, state)?
    } else if is_svg_element(node, "polyline") {
        parse_polyline(node, state)?
    } else if is_svg_element(node, "image") {
        parse_image_element(node, state)?
    } else if is_svg_element(node, "text") {
        parse_text(node, state)?
    } else if is_svg_element(node, "g") {
        parse_group(node, state)?
    } else if is_svg_element(node, "switch") {
        return parse_switch(node, state, shapes);
    } else if is_svg_element(node, "defs") {
        parse_defs(node, state, shapes)?;
        return Ok(false);
    } else if is_svg_element(node, "linearGradient")
        || is_svg_element(node, "radialGradient")
        || is_svg_element(node, "pattern")
    {
        register_definition(node, state)?;
        return Ok(false);
    } else {
        log::debug!("Skipping unsupported element: {}", node.tag_name().name());
        return Ok(false);
    };

    match shape {
        Some(mut shape) => {
            if let Some(id) = node.attribute("id") {
                shape.set_name(id);
            }
            shapes.push(shape);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Parses a referenced paint definition and stores it under its id.
/// Returns false when the node yields no usable paint.
fn register_definition(node: XmlNode, state: &ParseState) -> LoadResult<bool> {
    if let Some(id) = node.attribute("id") {
        // Already parsed through an earlier url() reference.
        if state.ids().cached_paint(id).is_some() {
            return Ok(true);
        }
    }
    let parsed = if is_svg_element(node, "linearGradient") {
        gradient::parse_linear_gradient_node(node, state)?
    } else if is_svg_element(node, "radialGradient") {
        gradient::parse_radial_gradient_node(node, state)?
    } else {
        gradient::parse_pattern_node(node, state)?
    };
    match parsed {
        Some((id, paint)) => {
            state.ids().register_paint(&id, paint);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Imports the children of a defs element. Paint definitions and the
/// calibration register for later use; structural children still go
/// through the content dispatch.
pub fn parse_defs(node: XmlNode, state: &ParseState, shapes: &mut Vec<Shape>) -> LoadResult<()> {
    for child in node.children().filter(|c| c.is_element()) {
        if is_svg_element(child, "linearGradient")
            || is_svg_element(child, "radialGradient")
            || is_svg_element(child, "pattern")
        {
            if !register_definition(child, state)? {
                state.props().add_warning("Ignored referenced item in <defs>");
            }
        } else if is_faint_element(child, "calibration") {
            gradient::parse_faint_calibration(child, state)?;
        } else if is_svg_element(child, "defs") {
            parse_defs(child, state, shapes)?;
        } else if is_svg_element(child, "g") || is_svg_element(child, "switch") {
            parse_content_node(child, state, shapes)?;
        } else {
            log::debug!("Skipping defs child: {}", child.tag_name().name());
        }
    }
    Ok(())
}

fn parse_group(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let mut children = Vec::new();
    for child in node.children().filter(|c| c.is_element()) {
        let produced = parse_content_node(child, &state, &mut children)?;
        if !produced && is_producer(child) {
            state.props().add_warning(format!(
                "Failed parsing child {} of group {}",
                maybe_id_ref(child),
                maybe_id_ref(node)
            ));
        }
    }
    if children.is_empty() {
        return Ok(None);
    }
    Ok(Some(Shape::Group(GroupShape::new(children))))
}

/// Evaluates a switch element: the first candidate child whose
/// conditional attributes all pass is imported, the rest are skipped.
fn parse_switch(node: XmlNode, state: &ParseState, shapes: &mut Vec<Shape>) -> LoadResult<bool> {
    for child in node.children().filter(|c| is_producer(*c)) {
        if !switch_condition_passes(child, state) {
            continue;
        }
        return parse_content_node(child, state, shapes);
    }
    state
        .props()
        .add_warning("No supported child node of SVG switch-element");
    Ok(false)
}

fn switch_condition_passes(child: XmlNode, state: &ParseState) -> bool {
    // Extensions are never supported, so any requirement fails.
    if child
        .attribute("requiredExtensions")
        .map_or(false, |v| !v.is_empty())
    {
        return false;
    }
    if let Some(features) = child.attribute("requiredFeatures") {
        if features
            .split(' ')
            .any(|feature| !SUPPORTED_SVG_FEATURES.contains(&feature))
        {
            return false;
        }
    }
    child
        .attribute("systemLanguage")
        .map_or(true, |lang| lang == state.language)
}

fn parse_rect_element(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    if faint_attr(node, "background").is_some() {
        parse_rect_as_background(node, state);
        return Ok(None);
    }
    parse_rect(node, state)
}

/// A rect marked faint:background sets the frame's background color
/// instead of producing a shape.
fn parse_rect_as_background(node: XmlNode, state: &ParseState) {
    let paint = parse_color(node.attribute("fill").unwrap_or(""), "1.0", state);
    match paint {
        Paint::Color(color) => state.props().set_background(Background::Color(color)),
        _ => state
            .props()
            .add_warning("Ignored background rect with non-color fill."),
    }
}

fn parse_rect(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let x = state.svg_coord_attr(node.attribute("x").unwrap_or("0"), Axis::X)?;
    let y = state.svg_coord_attr(node.attribute("y").unwrap_or("0"), Axis::Y)?;
    let w = state.svg_coord_attr(node.attribute("width").unwrap_or("0"), Axis::X)?;
    let h = state.svg_coord_attr(node.attribute("height").unwrap_or("0"), Axis::Y)?;
    let rx_attr = node.attribute("rx");
    let rx = state.svg_length_attr(rx_attr.unwrap_or("0"), Axis::X)?;
    // A missing ry takes the rx value, as SVG defines for rect.
    let ry = state.svg_length_attr(node.attribute("ry").or(rx_attr).unwrap_or("0"), Axis::Y)?;

    let tri = state.transform_tri(tri_from_rect(Rect::new(x, y, w, h)));
    let mut rect = RectShape::new(tri, state.settings.clone());
    rect.rx = rx;
    rect.ry = ry;
    Ok(Some(Shape::Rect(rect)))
}

fn parse_circle(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let cx = state.svg_coord_attr(node.attribute("cx").unwrap_or("0"), Axis::X)?;
    let cy = state.svg_coord_attr(node.attribute("cy").unwrap_or("0"), Axis::Y)?;
    let r = state.svg_length_attr(node.attribute("r").unwrap_or("0"), Axis::X)?;

    let tri = tri_from_rect(center_based_rect(Point::new(cx, cy), r, r));
    Ok(Some(Shape::Ellipse(EllipseShape::new(
        state.transform_tri(tri),
        state.settings.clone(),
    ))))
}

fn parse_ellipse(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let cx = state.svg_coord_attr(node.attribute("cx").unwrap_or("0.0"), Axis::X)?;
    let cy = state.svg_coord_attr(node.attribute("cy").unwrap_or("0.0"), Axis::Y)?;
    let rx = state.svg_coord_attr(node.attribute("rx").unwrap_or("0.0"), Axis::X)?;
    let ry = state.svg_coord_attr(node.attribute("ry").unwrap_or("0.0"), Axis::Y)?;

    let tri = tri_from_rect(center_based_rect(Point::new(cx, cy), rx, ry));
    Ok(Some(Shape::Ellipse(EllipseShape::new(
        state.transform_tri(tri),
        state.settings.clone(),
    ))))
}

/// The endpoint moved forward to the arrowhead tip. Lines with a front
/// arrow are saved shortened so the marker does not overshoot; import
/// restores the full length.
fn extend_to_arrow_tip(from: Point, to: Point, line_width: f64) -> Point {
    geom::displaced(to, geom::line_angle(from, to), arrow_back_off(line_width))
}

fn parse_line(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let x1 = state.svg_coord_attr(node.attribute("x1").unwrap_or("0"), Axis::X)?;
    let y1 = state.svg_coord_attr(node.attribute("y1").unwrap_or("0"), Axis::Y)?;
    let x2 = state.svg_coord_attr(node.attribute("x2").unwrap_or("0"), Axis::X)?;
    let y2 = state.svg_coord_attr(node.attribute("y2").unwrap_or("0"), Axis::Y)?;

    let p0 = Point::new(x1, y1);
    let mut p1 = Point::new(x2, y2);
    if state.settings.arrow == Arrow::Front {
        p1 = extend_to_arrow_tip(p0, p1, state.settings.line_width);
    }
    Ok(Some(Shape::Line(LineShape::new(
        state.ctm.apply(p0),
        state.ctm.apply(p1),
        state.settings.clone(),
    ))))
}

fn parse_polyline(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let mut coords = parse_points(node.attribute("points").unwrap_or(""))?;
    if state.settings.arrow == Arrow::Front && coords.len() >= 4 {
        let n = coords.len();
        let from = Point::new(coords[n - 4], coords[n - 3]);
        let to = Point::new(coords[n - 2], coords[n - 1]);
        let tip = extend_to_arrow_tip(from, to, state.settings.line_width);
        coords[n - 2] = tip.x;
        coords[n - 1] = tip.y;
    }
    if coords.len() % 2 != 0 {
        state.props().add_warning(format!(
            "Odd number of coordinates for polyline{}.",
            maybe_id_ref(node)
        ));
        coords.pop();
    }
    if coords.is_empty() {
        state.props().add_warning(format!(
            "Ignored polyline-element without points{}.",
            maybe_id_ref(node)
        ));
        return Ok(None);
    }
    let points = pair_points(&coords)
        .into_iter()
        .map(|p| state.ctm.apply(p))
        .collect();
    Ok(Some(Shape::Polyline(PolylineShape::new(
        points,
        state.settings.clone(),
    ))))
}

fn parse_polygon_element(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    if is_faint_type(node, "rect") {
        return parse_polygon_as_rect(node, state);
    }
    parse_polygon(node, state)
}

fn parse_polygon(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let mut coords = parse_points(node.attribute("points").unwrap_or(""))?;
    if coords.len() % 2 != 0 {
        state.props().add_warning(format!(
            "Odd number of coordinates for polygon{}.",
            maybe_id_ref(node)
        ));
        coords.pop();
    }
    if coords.is_empty() {
        state.props().add_warning(format!(
            "Ignored polygon-element without points{}.",
            maybe_id_ref(node)
        ));
        return Ok(None);
    }
    let points = pair_points(&coords)
        .into_iter()
        .map(|p| state.ctm.apply(p))
        .collect();
    Ok(Some(Shape::Polygon(PolygonShape::new(
        points,
        state.settings.clone(),
    ))))
}

/// A polygon marked faint:type="rect" restores a rectangle object. Its
/// four points trace the corners p0, p1, p3, p2, so the defining tri is
/// the first, second and last point.
fn parse_polygon_as_rect(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let points_str = node.attribute("points").unwrap_or("");
    let points = pair_points(&parse_points(points_str)?);
    if points.len() != 4 {
        return Err(LoadError::InvalidCoordinate(points_str.to_string()));
    }
    let tri = state.transform_tri(tri_from_points(points[0], points[1], points[3]));
    Ok(Some(Shape::Rect(RectShape::new(
        tri,
        state.settings.clone(),
    ))))
}

fn parse_path_element(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    if is_faint_type(node, "ellipse") {
        return parse_path_as_ellipse(node, state);
    }
    if is_faint_type(node, "spline") {
        return parse_path_as_spline(node, state);
    }
    parse_path(node, state)
}

/// A path marked faint:type="ellipse" restores an ellipse object from
/// its faint:tri attribute; the path data itself is redundant.
fn parse_path_as_ellipse(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let tri = state.transform_tri(parse_faint_tri_attr(node)?);
    Ok(Some(Shape::Ellipse(EllipseShape::new(
        tri,
        state.settings.clone(),
    ))))
}

fn parse_path(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let definition = node.attribute("d").unwrap_or("");
    if definition.trim().is_empty() {
        state.props().add_warning(format!(
            "Ignored path-element without definition attribute{}.",
            maybe_id_ref(node)
        ));
        return Ok(None);
    }
    let segments: Vec<PathSegment> = parse_path_data(definition)?
        .iter()
        .map(|s| s.transformed(&state.ctm))
        .collect();
    Ok(Some(Shape::Path(PathShape::new(
        segments,
        state.settings.clone(),
    ))))
}

/// A path marked faint:type="spline" restores the editor's spline
/// control points from the emitted midpoint curve. Paths that do not
/// have that structure fall back to a plain path object.
fn parse_path_as_spline(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let definition = node.attribute("d").unwrap_or("");
    if definition.trim().is_empty() {
        state.props().add_warning(format!(
            "Ignored path-element without definition attribute{}.",
            maybe_id_ref(node)
        ));
        return Ok(None);
    }
    let segments = parse_path_data(definition)?;
    match spline_points_from_path(&segments) {
        Some(points) => {
            let points = points.into_iter().map(|p| state.ctm.apply(p)).collect();
            Ok(Some(Shape::Spline(SplineShape::new(
                points,
                state.settings.clone(),
            ))))
        }
        None => {
            state.props().add_warning(format!(
                "Ignored spline-type on path-element{}.",
                maybe_id_ref(node)
            ));
            let segments = segments.iter().map(|s| s.transformed(&state.ctm)).collect();
            Ok(Some(Shape::Path(PathShape::new(
                segments,
                state.settings.clone(),
            ))))
        }
    }
}

fn points_close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

/// Inverts the saved spline form: a move to the first control point, a
/// line to the first midpoint, then one cubic per remaining control
/// point with the point itself as trailing control. Returns None when
/// the segments do not have that shape.
fn spline_points_from_path(segments: &[PathSegment]) -> Option<Vec<Point>> {
    let (first, rest) = segments.split_first()?;
    let &PathSegment::MoveTo(p0) = first else {
        return None;
    };
    let (second, cubics) = rest.split_first()?;
    let &PathSegment::LineTo(first_mid) = second else {
        return None;
    };

    let mut points = vec![p0];
    if cubics.is_empty() {
        // Two-point spline: the line ends halfway to the second point.
        points.push(Point::new(
            2.0 * first_mid.x - p0.x,
            2.0 * first_mid.y - p0.y,
        ));
        return Some(points);
    }

    let mut pen = first_mid;
    for segment in cubics {
        let &PathSegment::CubicTo { p, c, d } = segment else {
            return None;
        };
        // Each curve starts where the previous one ended.
        if !points_close(c, pen) {
            return None;
        }
        points.push(d);
        pen = p;
    }
    let &PathSegment::CubicTo { p, d, .. } = cubics.last()? else {
        return None;
    };
    points.push(Point::new(2.0 * p.x - d.x, 2.0 * p.y - d.y));

    if !points_close(first_mid, mid_point(points[0], points[1])) {
        return None;
    }
    Some(points)
}

fn parse_image_element(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    if faint_attr(node, "background").is_some() {
        parse_image_as_background(node, state);
        return Ok(None);
    }
    parse_image(node, state)
}

/// An image marked faint:background becomes the frame background.
/// Only PNG data is supported there.
fn parse_image_as_background(node: XmlNode, state: &ParseState) {
    let Some(href) = xlink_attr(node, "href") else {
        state
            .props()
            .add_warning("Ignored image element with no data.");
        return;
    };
    match parse_embedded_image_data(href) {
        Some((ImageFormat::Png, data)) => {
            state
                .props()
                .set_background(Background::Image(EmbeddedImage::png(data)));
        }
        _ => state.props().add_warning(format!(
            "Ignored image element with unsupported type: {}",
            href.split(',').next().unwrap_or(href)
        )),
    }
}

fn parse_image(node: XmlNode, state: &ParseState) -> LoadResult<Option<Shape>> {
    let state = state.updated(node)?;
    let x = state.svg_length_attr(node.attribute("x").unwrap_or("0.0"), Axis::X)?;
    let y = state.svg_length_attr(node.attribute("y").unwrap_or("0.0"), Axis::Y)?;
    let w = state.svg_length_attr(node.attribute("width").unwrap_or("0.0"), Axis::X)?;
    let h = state.svg_length_attr(node.attribute("height").unwrap_or("0.0"), Axis::Y)?;

    let Some(href) = xlink_attr(node, "href") else {
        state
            .props()
            .add_warning("Ignored image element with no data.");
        return Ok(None);
    };
    let Some((format, data)) = parse_embedded_image_data(href) else {
        state.props().add_warning(format!(
            "Ignored image element with unsupported type: {}",
            href.split(',').next().unwrap_or(href)
        ));
        return Ok(None);
    };
    let image = match format {
        ImageFormat::Png => EmbeddedImage::png(data),
        ImageFormat::Jpeg => EmbeddedImage::jpeg(data),
    };

    let tri = state.transform_tri(tri_from_rect(Rect::new(x, y, w, h)));
    let mut raster = RasterShape::new(tri, image);
    raster.style = state.settings.clone();
    raster.bg_style = faint_attr(node, "bg-style").map(str::to_string);
    raster.mask_color = faint_attr(node, "mask-color").map(|value| parse_color_noref(value, 1.0, &state));
    Ok(Some(Shape::Raster(raster)))
}

/// Reads the faint:tri attribute: three space separated points giving
/// an object's exact placement.
fn parse_faint_tri_attr(node: XmlNode) -> LoadResult<Tri> {
    let tri_str = faint_attr(node, "tri").unwrap_or("");
    let points = pair_points(&parse_points(tri_str)?);
    if points.len() != 3 {
        return Err(LoadError::InvalidCoordinate(tri_str.to_string()));
    }
    Ok(tri_from_points(points[0], points[1], points[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::state::{FrameProps, IdTable};
    use crate::models::{FillMode, Rgba};
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    const NS_DECL: &str = "xmlns='http://www.w3.org/2000/svg' \
                           xmlns:xlink='http://www.w3.org/1999/xlink' \
                           xmlns:faint='http://www.code.google.com/p/faint-graphics-editor'";

    fn import(markup: &str) -> (Vec<Shape>, Vec<String>) {
        let doc = roxmltree::Document::parse(markup).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::from_document(&doc);
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let mut shapes = Vec::new();
        parse_content_node(doc.root_element(), &state, &mut shapes).unwrap();
        (shapes, props.warnings())
    }

    fn import_one(markup: &str) -> Shape {
        let (mut shapes, _) = import(markup);
        assert_eq!(shapes.len(), 1, "expected one shape");
        shapes.remove(0)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn rect_from_attributes() {
        let shape = import_one(&format!(
            "<rect {} id='r1' x='10' y='20' width='30' height='40'/>",
            NS_DECL
        ));
        match shape {
            Shape::Rect(r) => {
                assert_eq!(r.name.as_deref(), Some("r1"));
                assert_eq!(r.tri.p0(), Point::new(10.0, 20.0));
                assert_eq!(r.tri.p3(), Point::new(40.0, 60.0));
                assert_eq!(r.rx, 0.0);
            }
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn rect_missing_ry_takes_rx() {
        let shape = import_one(&format!(
            "<rect {} width='10' height='10' rx='3'/>",
            NS_DECL
        ));
        match shape {
            Shape::Rect(r) => {
                assert_eq!(r.rx, 3.0);
                assert_eq!(r.ry, 3.0);
                assert!(r.rounded());
            }
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn rect_transform_applies_once() {
        let shape = import_one(&format!(
            "<rect {} x='1' y='1' width='2' height='2' transform='translate(10,0) scale(2)'/>",
            NS_DECL
        ));
        match shape {
            Shape::Rect(r) => {
                assert_eq!(r.tri.p0(), Point::new(12.0, 2.0));
                assert_eq!(r.tri.p1(), Point::new(16.0, 2.0));
            }
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn circle_becomes_centered_ellipse() {
        let shape = import_one(&format!("<circle {} cx='50' cy='60' r='10'/>", NS_DECL));
        match shape {
            Shape::Ellipse(e) => {
                assert_eq!(e.tri.p0(), Point::new(40.0, 50.0));
                assert_close(e.tri.width(), 20.0);
                assert_close(e.tri.height(), 20.0);
            }
            other => panic!("not an ellipse: {:?}", other),
        }
    }

    #[test]
    fn path_with_ellipse_type_uses_faint_tri() {
        let shape = import_one(&format!(
            "<path {} d='M 0 0' faint:type='ellipse' \
             faint:tri='1.000000,2.000000 21.000000,2.000000 1.000000,12.000000'/>",
            NS_DECL
        ));
        match shape {
            Shape::Ellipse(e) => {
                assert_eq!(e.tri.p0(), Point::new(1.0, 2.0));
                assert_close(e.tri.width(), 20.0);
                assert_close(e.tri.height(), 10.0);
            }
            other => panic!("not an ellipse: {:?}", other),
        }
    }

    #[test]
    fn line_without_arrow_keeps_endpoints() {
        let shape = import_one(&format!(
            "<line {} x1='1' y1='2' x2='31' y2='42'/>",
            NS_DECL
        ));
        match shape {
            Shape::Line(l) => {
                assert_eq!(l.p0, Point::new(1.0, 2.0));
                assert_eq!(l.p1, Point::new(31.0, 42.0));
            }
            other => panic!("not a line: {:?}", other),
        }
    }

    #[test]
    fn front_arrow_extends_line_to_tip() {
        // Marker references set the arrowhead; the saved line stops
        // 4 * stroke-width short of the tip along the line direction.
        let shape = import_one(&format!(
            "<line {} x1='0' y1='0' x2='10' y2='0' stroke-width='1' \
             marker-end='url(#Arrowhead)'/>",
            NS_DECL
        ));
        match shape {
            Shape::Line(l) => {
                assert_eq!(l.style.arrow, Arrow::Front);
                assert_close(l.p1.x, 14.0);
                assert_close(l.p1.y, 0.0);
            }
            other => panic!("not a line: {:?}", other),
        }
    }

    #[test]
    fn polygon_collects_point_pairs() {
        let shape = import_one(&format!(
            "<polygon {} points='0,0 10,0 10,10 0,10'/>",
            NS_DECL
        ));
        match shape {
            Shape::Polygon(p) => {
                assert_eq!(p.points.len(), 4);
                assert_eq!(p.points[2], Point::new(10.0, 10.0));
            }
            other => panic!("not a polygon: {:?}", other),
        }
    }

    #[test]
    fn odd_polygon_coordinate_dropped_with_warning() {
        let (shapes, warnings) = import(&format!(
            "<polygon {} id='p' points='0,0 10,0 10'/>",
            NS_DECL
        ));
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Polygon(p) => {
                assert_eq!(p.points, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
            }
            other => panic!("not a polygon: {:?}", other),
        }
        assert!(warnings[0].contains("Odd number of coordinates for polygon (id=p)."));
    }

    #[test]
    fn polygon_with_rect_type_restores_rect() {
        // Corner ring p0, p1, p3, p2.
        let shape = import_one(&format!(
            "<polygon {} faint:type='rect' points='0, 0, 20, 0, 20, 10, 0, 10'/>",
            NS_DECL
        ));
        match shape {
            Shape::Rect(r) => {
                assert_eq!(r.tri.p0(), Point::new(0.0, 0.0));
                assert_eq!(r.tri.p1(), Point::new(20.0, 0.0));
                assert_eq!(r.tri.p2(), Point::new(0.0, 10.0));
            }
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn path_without_definition_warns_and_skips() {
        let (shapes, warnings) = import(&format!("<path {} id='p'/>", NS_DECL));
        assert!(shapes.is_empty());
        assert_eq!(
            warnings[0],
            "Ignored path-element without definition attribute (id=p)."
        );
    }

    #[test]
    fn malformed_path_definition_is_fatal() {
        let text = format!("<path {} d='M 1 Q'/>", NS_DECL);
        let doc = roxmltree::Document::parse(&text).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::new();
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let mut shapes = Vec::new();
        let err = parse_content_node(doc.root_element(), &state, &mut shapes).unwrap_err();
        assert!(matches!(err, LoadError::InvalidPathData(_)));
    }

    #[test]
    fn spline_path_restores_control_points() {
        // Saved form of the spline through (0,0), (10,0), (10,10).
        let shape = import_one(&format!(
            "<path {} faint:type='spline' d='M 0 0 L 5 0 C 5 0 10 0 10 5'/>",
            NS_DECL
        ));
        match shape {
            Shape::Spline(s) => {
                assert_eq!(s.points.len(), 3);
                assert_eq!(s.points[0], Point::new(0.0, 0.0));
                assert_eq!(s.points[1], Point::new(10.0, 0.0));
                assert_eq!(s.points[2], Point::new(10.0, 10.0));
            }
            other => panic!("not a spline: {:?}", other),
        }
    }

    #[test]
    fn unrecognized_spline_form_falls_back_to_path() {
        let (shapes, warnings) = import(&format!(
            "<path {} faint:type='spline' d='M 0 0 L 5 5 L 10 0'/>",
            NS_DECL
        ));
        assert!(matches!(shapes[0], Shape::Path(_)));
        assert!(warnings[0].contains("Ignored spline-type on path-element"));
    }

    #[test]
    fn group_nests_children_and_inherits_style() {
        let shape = import_one(&format!(
            "<g {} id='grp' fill='blue'><rect width='5' height='5'/><line x2='3'/></g>",
            NS_DECL
        ));
        match shape {
            Shape::Group(g) => {
                assert_eq!(g.name.as_deref(), Some("grp"));
                assert_eq!(g.shapes.len(), 2);
                match &g.shapes[0] {
                    Shape::Rect(r) => {
                        assert_eq!(r.style.fill_mode, FillMode::Fill);
                        assert_eq!(r.style.fg, Paint::Color(Rgba::rgb(0, 0, 255)));
                    }
                    other => panic!("not a rect: {:?}", other),
                }
            }
            other => panic!("not a group: {:?}", other),
        }
    }

    #[test]
    fn empty_group_produces_nothing() {
        let (shapes, _) = import(&format!("<g {}><desc>nothing</desc></g>", NS_DECL));
        assert!(shapes.is_empty());
    }

    #[test]
    fn failed_group_child_warns_with_ids() {
        let (shapes, warnings) = import(&format!(
            "<g {} id='grp'><path id='child'/></g>",
            NS_DECL
        ));
        assert!(shapes.is_empty());
        assert!(warnings
            .iter()
            .any(|w| w == "Failed parsing child  (id=child) of group  (id=grp)"));
    }

    #[test]
    fn switch_picks_first_supported_child() {
        let shape = import_one(&format!(
            "<switch {}>\
               <rect requiredExtensions='http://example.com/ext' width='1' height='1'/>\
               <rect requiredFeatures='http://www.w3.org/TR/SVG11/feature#Shape' \
                     width='2' height='2'/>\
               <rect width='3' height='3'/>\
             </switch>",
            NS_DECL
        ));
        match shape {
            Shape::Rect(r) => assert_close(r.tri.width(), 2.0),
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn switch_matches_system_language_exactly() {
        let (shapes, _) = import(&format!(
            "<switch {}>\
               <rect systemLanguage='de' width='1' height='1'/>\
               <rect systemLanguage='en' width='2' height='2'/>\
             </switch>",
            NS_DECL
        ));
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Rect(r) => assert_close(r.tri.width(), 2.0),
            other => panic!("not a rect: {:?}", other),
        }
    }

    #[test]
    fn switch_without_match_warns() {
        let (shapes, warnings) = import(&format!(
            "<switch {}><rect requiredFeatures='http://example.com/unknown'/></switch>",
            NS_DECL
        ));
        assert!(shapes.is_empty());
        assert_eq!(warnings[0], "No supported child node of SVG switch-element");
    }

    #[test]
    fn background_rect_sets_frame_background() {
        let text = format!(
            "<rect {} faint:background='1' fill='rgb(1, 2, 3)' width='100%' height='100%'/>",
            NS_DECL
        );
        let doc = roxmltree::Document::parse(&text).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::new();
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let mut shapes = Vec::new();
        let produced = parse_content_node(doc.root_element(), &state, &mut shapes).unwrap();
        assert!(!produced);
        assert!(shapes.is_empty());
        assert_eq!(
            props.take_background(),
            Some(Background::Color(Rgba::rgb(1, 2, 3)))
        );
    }

    #[test]
    fn image_without_data_warns() {
        let (shapes, warnings) = import(&format!(
            "<image {} x='0' y='0' width='4' height='4'/>",
            NS_DECL
        ));
        assert!(shapes.is_empty());
        assert_eq!(warnings[0], "Ignored image element with no data.");
    }

    #[test]
    fn image_with_png_data_becomes_raster() {
        let shape = import_one(&format!(
            "<image {} x='5' y='6' width='7' height='8' \
             xlink:href='data:image/png;base64,aGVsbG8='/>",
            NS_DECL
        ));
        match shape {
            Shape::Raster(r) => {
                assert_eq!(r.tri.p0(), Point::new(5.0, 6.0));
                assert_eq!(r.image.format, ImageFormat::Png);
                assert_eq!(r.image.data, b"hello");
            }
            other => panic!("not a raster: {:?}", other),
        }
    }

    #[test]
    fn image_with_unsupported_type_warns() {
        let (shapes, warnings) = import(&format!(
            "<image {} xlink:href='data:image/gif;base64,aGVsbG8='/>",
            NS_DECL
        ));
        assert!(shapes.is_empty());
        assert_eq!(
            warnings[0],
            "Ignored image element with unsupported type: data:image/gif;base64"
        );
    }

    #[test]
    fn defs_gradient_registers_for_lookup() {
        let markup = format!(
            "<defs {}>\
               <linearGradient id='g'><stop offset='0' stop-color='red'/></linearGradient>\
             </defs>",
            NS_DECL
        );
        let doc = roxmltree::Document::parse(&markup).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::from_document(&doc);
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let mut shapes = Vec::new();
        parse_defs(doc.root_element(), &state, &mut shapes).unwrap();
        assert!(ids.cached_paint("g").is_some());
    }

    #[test]
    fn useless_defs_item_warns() {
        let markup = format!("<defs {}><linearGradient id='empty'/></defs>", NS_DECL);
        let doc = roxmltree::Document::parse(&markup).unwrap();
        let props = FrameProps::new(640, 480);
        let ids = IdTable::from_document(&doc);
        let referenced = RefCell::new(BTreeSet::new());
        let state = ParseState::new(&props, &ids, &referenced, "en");
        let mut shapes = Vec::new();
        parse_defs(doc.root_element(), &state, &mut shapes).unwrap();
        let warnings = props.warnings();
        assert!(warnings
            .iter()
            .any(|w| w == "Ignored referenced item in <defs>"));
    }
}
