//! Shape to SVG element conversion.
//!
//! Each builder mirrors one shape kind. Shapes the SVG model cannot
//! express directly are marked up with `faint:` attributes so a later
//! import restores the editor object rather than the approximation.

use crate::geom::{self, Point, Tri};
use crate::models::{
    Arrow, EllipseShape, GroupShape, LineShape, Paint, PaintStyle, PathSegment, PathShape,
    PolygonShape, PolylineShape, RasterShape, RectShape, Rgba, Shape, SplineShape,
};

use super::defs::{arrow_back_off, image_data_uri, MarkerKind, SvgBuildState};
use super::style::{
    format_float, svg_fill_style, svg_line_dash_style, svg_line_join_style, svg_line_style,
    svg_no_fill, to_rgb_color,
};
use super::text::build_text;
use super::tree::SvgElement;

/// Builds the SVG element for a shape, registering any defs it needs.
/// Returns `None` for shapes with nothing to write.
pub fn build_shape(shape: &Shape, state: &mut SvgBuildState) -> Option<SvgElement> {
    let mut element = match shape {
        Shape::Rect(s) => build_rect(s, state),
        Shape::Ellipse(s) => build_ellipse_path(s, state),
        Shape::Line(s) => build_line(s, state),
        Shape::Polyline(s) => build_polyline(s, state),
        Shape::Polygon(s) => build_polygon(s, state),
        Shape::Path(s) => build_path(s, state)?,
        Shape::Spline(s) => build_spline_path(s, state),
        Shape::Text(s) => build_text(s, state),
        Shape::Group(s) => build_group(s, state),
        Shape::Raster(s) => build_image(s),
    };
    if let Some(name) = shape.name() {
        element.set("id", name);
    }
    Some(element)
}

/// Style string for filled outline shapes: fill mode, dashes and join.
fn shape_style(style: &PaintStyle, state: &mut SvgBuildState) -> String {
    format!(
        "{}{}{}",
        svg_fill_style(style, state),
        svg_line_dash_style(style),
        svg_line_join_style(style)
    )
}

fn build_rect(shape: &RectShape, state: &mut SvgBuildState) -> SvgElement {
    if shape.rounded() {
        build_rounded_rect(shape, state)
    } else {
        build_rect_polygon(shape, state)
    }
}

/// A square-cornered rect saves as a polygon so rotation and skew need
/// no transform attribute.
fn build_rect_polygon(shape: &RectShape, state: &mut SvgBuildState) -> SvgElement {
    let t = &shape.tri;
    let corners = [t.p0(), t.p1(), t.p3(), t.p2()];
    let mut element = SvgElement::new("polygon");
    element.set("faint:type", "rect");
    element.set("points", flat_coords(&corners).join(", "));
    element.set("style", shape_style(&shape.style, state));
    element
}

fn build_rounded_rect(shape: &RectShape, state: &mut SvgBuildState) -> SvgElement {
    let t = &shape.tri;
    let p0 = t.p0();
    let mut element = SvgElement::new("rect");
    element.set("x", format_float(p0.x));
    element.set("y", format_float(p0.y));
    element.set("width", format_float(t.width()));
    element.set("height", format_float(t.height()));
    element.set("rx", format_float(shape.rx));
    element.set("ry", format_float(shape.ry));
    let angle = t.angle();
    if angle != 0.0 {
        element.set(
            "transform",
            format!(
                "rotate({:.6}, {:.6}, {:.6})",
                angle.to_degrees(),
                p0.x,
                p0.y
            ),
        );
    }
    element.set("style", shape_style(&shape.style, state));
    element
}

fn build_ellipse_path(shape: &EllipseShape, state: &mut SvgBuildState) -> SvgElement {
    let mut element = SvgElement::new("path");
    element.set("d", path_data_string(&ellipse_path_segments(&shape.tri)));
    element.set(
        "style",
        format!(
            "{}{}",
            svg_fill_style(&shape.style, state),
            svg_line_dash_style(&shape.style)
        ),
    );
    element.set("faint:tri", tri_attr_value(&shape.tri));
    element.set("faint:type", "ellipse");
    element
}

/// An ellipse approximated by four cubic beziers, skewed and rotated
/// per the tri. Import reads the faint:tri attribute back instead of
/// the curve, so the curve is for other renderers.
pub(crate) fn ellipse_path_segments(tri: &Tri) -> Vec<PathSegment> {
    let angle = tri.angle();
    let skew = tri.skew();
    let axis = tri.rotated(-angle, tri.p0());
    // Top-left of the deskewed box sits straight above p2.
    let x = axis.p2().x;
    let y = axis.p0().y;
    let dx = tri.width();
    let dy = axis.p2().y - y;
    let rx = dx / 2.0;
    let ry = dy / 2.0;
    let t = 0.551784;
    let skew_2 = skew * (0.5 - 0.5 * t);
    let skew_3 = skew * 0.5;
    let skew_4 = skew * (0.5 + 0.5 * t);
    let skew_5 = skew;
    let origin = tri.p0();
    let rot = |px: f64, py: f64| geom::rotate_point(Point::new(px, py), angle, origin);
    vec![
        PathSegment::MoveTo(rot(x + rx, y + dy)),
        PathSegment::CubicTo {
            p: rot(x + dx + skew_3, y + ry),
            c: rot(x + rx + rx * t, y + dy),
            d: rot(x + dx + skew_2, y + ry + ry * t),
        },
        PathSegment::CubicTo {
            p: rot(x + rx + skew_5, y),
            c: rot(x + dx + skew_4, y + ry - ry * t),
            d: rot(x + rx + rx * t + skew_5, y),
        },
        PathSegment::CubicTo {
            p: rot(x + skew_3, y + ry),
            c: rot(x + rx - rx * t + skew_5, y),
            d: rot(x + skew_4, y + ry - ry * t),
        },
        PathSegment::CubicTo {
            p: rot(x + rx, y + dy),
            c: rot(x + skew_2, y + ry + ry * t),
            d: rot(x + rx - rx * t, y + dy),
        },
    ]
}

/// Spline control points as a drawable path: a line to the first
/// midpoint, then a cubic through each following midpoint.
pub(crate) fn spline_path_segments(points: &[Point]) -> Vec<PathSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut control = points[1];
    let mut pen = geom::mid_point(points[0], control);
    let mut segments = vec![PathSegment::MoveTo(points[0]), PathSegment::LineTo(pen)];
    for pt in &points[2..] {
        let d = control;
        control = *pt;
        let p = geom::mid_point(d, control);
        segments.push(PathSegment::CubicTo { p, c: pen, d });
        pen = p;
    }
    segments
}

/// Serializes path segments as SVG path data. Arc rotations convert to
/// degrees on the way out.
pub(crate) fn path_data_string(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) => out.push_str(&format!("M {} {} ", p.x, p.y)),
            PathSegment::LineTo(p) => out.push_str(&format!("L {} {} ", p.x, p.y)),
            PathSegment::CubicTo { p, c, d } => {
                out.push_str(&format!("C {} {} {} {} {} {} ", c.x, c.y, d.x, d.y, p.x, p.y));
            }
            PathSegment::ArcTo {
                rx,
                ry,
                axis_rotation,
                large_arc,
                sweep,
                p,
            } => {
                out.push_str(&format!(
                    "A {} {} {} {} {} {} {} ",
                    rx,
                    ry,
                    axis_rotation.to_degrees(),
                    i32::from(large_arc),
                    i32::from(sweep),
                    p.x,
                    p.y
                ));
            }
            PathSegment::Close => out.push_str("z "),
        }
    }
    out.pop();
    out
}

/// Where a forward-arrowed line must end so the arrowhead tip lands on
/// the true endpoint.
fn shortened_line_end(from: Point, to: Point, line_width: f64) -> Point {
    geom::displaced(to, geom::line_angle(to, from), arrow_back_off(line_width))
}

fn stroke_rgb(paint: &Paint) -> Rgba {
    match paint {
        Paint::Color(color) => *color,
        _ => Rgba::black(),
    }
}

/// Sets marker references for arrowed ends, registering the marker
/// defs for the stroke color.
fn set_arrow_markers(element: &mut SvgElement, style: &PaintStyle, state: &mut SvgBuildState) {
    let color = stroke_rgb(&style.fg);
    if style.arrow.at_front() {
        let id = state.marker_id(MarkerKind::Head, color);
        element.set("marker-end", format!("url(#{})", id));
    }
    if style.arrow.at_back() {
        let id = state.marker_id(MarkerKind::Tail, color);
        element.set("marker-start", format!("url(#{})", id));
    }
}

fn build_line(shape: &LineShape, state: &mut SvgBuildState) -> SvgElement {
    let mut element = SvgElement::new("line");
    element.set("x1", format_float(shape.p0.x));
    element.set("y1", format_float(shape.p0.y));
    let end = if shape.style.arrow == Arrow::Front {
        shortened_line_end(shape.p0, shape.p1, shape.style.line_width)
    } else {
        shape.p1
    };
    element.set("x2", format_float(end.x));
    element.set("y2", format_float(end.y));
    element.set(
        "style",
        format!(
            "{}{}",
            svg_line_style(&shape.style, state),
            svg_line_dash_style(&shape.style)
        ),
    );
    set_arrow_markers(&mut element, &shape.style, state);
    element
}

fn build_polyline(shape: &PolylineShape, state: &mut SvgBuildState) -> SvgElement {
    let mut points = shape.points.clone();
    if shape.style.arrow == Arrow::Front && points.len() >= 2 {
        let last = points.len() - 1;
        points[last] =
            shortened_line_end(points[last - 1], points[last], shape.style.line_width);
    }
    let mut element = SvgElement::new("polyline");
    element.set("points", flat_coords(&points).join(","));
    element.set(
        "style",
        format!(
            "{}{}fill:none",
            svg_line_style(&shape.style, state),
            svg_line_dash_style(&shape.style)
        ),
    );
    set_arrow_markers(&mut element, &shape.style, state);
    element
}

fn build_polygon(shape: &PolygonShape, state: &mut SvgBuildState) -> SvgElement {
    let mut element = SvgElement::new("polygon");
    element.set("points", flat_coords(&shape.points).join(" "));
    element.set("style", shape_style(&shape.style, state));
    element
}

fn build_path(shape: &PathShape, state: &mut SvgBuildState) -> Option<SvgElement> {
    let d = path_data_string(&shape.segments);
    if d.is_empty() {
        log::warn!("Skipping empty path");
        return None;
    }
    let mut element = SvgElement::new("path");
    element.set("d", d);
    element.set("style", shape_style(&shape.style, state));
    Some(element)
}

fn build_spline_path(shape: &SplineShape, state: &mut SvgBuildState) -> SvgElement {
    let mut element = SvgElement::new("path");
    element.set("d", path_data_string(&spline_path_segments(&shape.points)));
    element.set("faint:type", "spline");
    element.set(
        "style",
        format!(
            "{}{}{}",
            svg_line_style(&shape.style, state),
            svg_line_dash_style(&shape.style),
            svg_no_fill()
        ),
    );
    element
}

fn build_group(shape: &GroupShape, state: &mut SvgBuildState) -> SvgElement {
    let mut group = SvgElement::new("g");
    for child in &shape.shapes {
        if let Some(element) = build_shape(child, state) {
            group.append(element);
        }
    }
    group
}

fn build_image(shape: &RasterShape) -> SvgElement {
    let mut element = SvgElement::new("image");
    let (transform, x_offset) = transform_and_offset(&shape.tri);
    if !transform.is_empty() {
        element.set("transform", transform);
    }
    let p0 = shape.tri.p0();
    element.set("x", format_float(p0.x + x_offset));
    element.set("y", format_float(p0.y));
    element.set("width", format_float(shape.tri.width()));
    element.set("height", format_float(shape.tri.height()));
    if let Some(bg_style) = &shape.bg_style {
        element.set("faint:bg-style", bg_style.clone());
    }
    if let Some(mask) = shape.mask_color {
        element.set("faint:mask-color", to_rgb_color(mask));
    }
    element.set("xlink:href", image_data_uri(&shape.image));
    element
}

/// Decomposes a tri into rotate and skewX transforms, plus the
/// x-offset that compensates skewX pivoting around y = 0.
fn transform_and_offset(tri: &Tri) -> (String, f64) {
    let angle = tri.angle();
    let p0 = tri.p0();
    let mut transform = String::new();
    if angle != 0.0 {
        transform.push_str(&rotate_transform(angle, p0));
    }
    // Rotated tris measure skew with float residue.
    let skew = tri.skew();
    let mut x_offset = 0.0;
    if skew.abs() > 1e-6 {
        if !transform.is_empty() {
            transform.push(' ');
        }
        let axis = tri.rotated(-angle, p0);
        let skew_angle = skew.atan2(p0.y - axis.p2().y);
        transform.push_str(&format!("skewX({:.6})", skew_angle.to_degrees()));
        x_offset = -p0.y * skew_angle.tan();
    }
    (transform, x_offset)
}

pub(crate) fn rotate_transform(angle: f64, origin: Point) -> String {
    format!(
        "rotate({:.6},{:.6},{:.6})",
        angle.to_degrees(),
        origin.x,
        origin.y
    )
}

fn flat_coords(points: &[Point]) -> Vec<String> {
    points
        .iter()
        .flat_map(|p| [format_float(p.x), format_float(p.y)])
        .collect()
}

/// The faint:tri value: p0, p1 and p2 as comma-joined pairs.
fn tri_attr_value(tri: &Tri) -> String {
    format!(
        "{:.6},{:.6} {:.6},{:.6} {:.6},{:.6}",
        tri.p0().x,
        tri.p0().y,
        tri.p1().x,
        tri.p1().y,
        tri.p2().x,
        tri.p2().y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{tri_from_rect, Rect};
    use crate::models::{EmbeddedImage, FillMode};

    fn border_style() -> PaintStyle {
        PaintStyle {
            fill_mode: FillMode::Border,
            fg: Paint::Color(Rgba::black()),
            ..PaintStyle::default()
        }
    }

    #[test]
    fn polygon_points_are_space_separated() {
        let shape = PolygonShape::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 5.0),
            ],
            border_style(),
        );
        let element = build_polygon(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("points"), Some("0.0 0.0 10.0 0.0 10.0 5.0"));
    }

    #[test]
    fn polyline_points_form_one_comma_list() {
        let shape = PolylineShape::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
            border_style(),
        );
        let element = build_polyline(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("points"), Some("0.0,0.0,10.0,5.0"));
        let style = element.attr("style").unwrap();
        assert!(style.ends_with("fill:none"));
    }

    #[test]
    fn rect_saves_as_marked_polygon() {
        let shape = RectShape::new(tri_from_rect(Rect::new(0.0, 0.0, 20.0, 10.0)), border_style());
        let element = build_rect(&shape, &mut SvgBuildState::new());
        assert_eq!(element.name(), "polygon");
        assert_eq!(element.attr("faint:type"), Some("rect"));
        assert_eq!(
            element.attr("points"),
            Some("0.0, 0.0, 20.0, 0.0, 20.0, 10.0, 0.0, 10.0")
        );
    }

    #[test]
    fn rounded_rect_keeps_both_radii() {
        let mut shape =
            RectShape::new(tri_from_rect(Rect::new(1.0, 2.0, 20.0, 10.0)), border_style());
        shape.rx = 3.0;
        shape.ry = 2.0;
        let element = build_rect(&shape, &mut SvgBuildState::new());
        assert_eq!(element.name(), "rect");
        assert_eq!(element.attr("rx"), Some("3.0"));
        assert_eq!(element.attr("ry"), Some("2.0"));
        assert_eq!(element.attr("transform"), None);
    }

    #[test]
    fn rotated_rounded_rect_gets_spaced_rotate() {
        let tri = tri_from_rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .rotated(std::f64::consts::FRAC_PI_4, Point::new(0.0, 0.0));
        let mut shape = RectShape::new(tri, border_style());
        shape.rx = 1.0;
        shape.ry = 1.0;
        let element = build_rect(&shape, &mut SvgBuildState::new());
        assert_eq!(
            element.attr("transform"),
            Some("rotate(45.000000, 0.000000, 0.000000)")
        );
    }

    #[test]
    fn front_arrow_shortens_the_written_line() {
        let mut style = border_style();
        style.arrow = Arrow::Front;
        let shape = LineShape::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), style);
        let element = build_line(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("x2"), Some("6.0"));
        assert_eq!(element.attr("marker-end"), Some("url(#Arrowhead)"));
        assert_eq!(element.attr("marker-start"), None);
    }

    #[test]
    fn both_arrows_keep_the_full_line() {
        let mut style = border_style();
        style.arrow = Arrow::Both;
        let shape = LineShape::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), style);
        let element = build_line(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("x2"), Some("10.0"));
        assert_eq!(element.attr("marker-end"), Some("url(#Arrowhead)"));
        assert_eq!(element.attr("marker-start"), Some("url(#Arrowtail)"));
    }

    #[test]
    fn polyline_both_arrows_write_both_markers() {
        let mut style = border_style();
        style.arrow = Arrow::Both;
        let shape = PolylineShape::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0),
                Point::new(10.0, 0.0),
            ],
            style,
        );
        let element = build_polyline(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("marker-end"), Some("url(#Arrowhead)"));
        assert_eq!(element.attr("marker-start"), Some("url(#Arrowtail)"));
    }

    #[test]
    fn spline_saves_midpoint_curve() {
        let shape = SplineShape::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ],
            border_style(),
        );
        let element = build_spline_path(&shape, &mut SvgBuildState::new());
        assert_eq!(element.attr("d"), Some("M 0 0 L 5 0 C 5 0 10 0 10 5"));
        assert_eq!(element.attr("faint:type"), Some("spline"));
        assert!(element.attr("style").unwrap().ends_with("fill:none;"));
    }

    #[test]
    fn ellipse_path_marks_up_the_tri() {
        let shape = EllipseShape::new(
            tri_from_rect(Rect::new(1.0, 2.0, 20.0, 10.0)),
            border_style(),
        );
        let element = build_ellipse_path(&shape, &mut SvgBuildState::new());
        assert_eq!(
            element.attr("faint:tri"),
            Some("1.000000,2.000000 21.000000,2.000000 1.000000,12.000000")
        );
        assert_eq!(element.attr("faint:type"), Some("ellipse"));
    }

    #[test]
    fn ellipse_curve_passes_through_the_axis_points() {
        let d = path_data_string(&ellipse_path_segments(&tri_from_rect(Rect::new(
            0.0, 0.0, 10.0, 10.0,
        ))));
        assert!(d.starts_with("M 5 10 C"));
        assert!(d.contains(" 10 5 C"));
        assert!(d.contains(" 5 0 C"));
        assert!(d.contains(" 0 5 C"));
        assert!(d.ends_with(" 5 10"));
        assert!(!d.contains('z'));
    }

    #[test]
    fn empty_path_is_skipped() {
        let shape = PathShape::new(Vec::new(), border_style());
        assert!(build_path(&shape, &mut SvgBuildState::new()).is_none());
    }

    #[test]
    fn arc_segments_serialize_flags_and_degrees() {
        let d = path_data_string(&[
            PathSegment::MoveTo(Point::new(1.0, 2.0)),
            PathSegment::ArcTo {
                rx: 3.0,
                ry: 4.0,
                axis_rotation: std::f64::consts::FRAC_PI_2,
                large_arc: true,
                sweep: false,
                p: Point::new(5.0, 6.0),
            },
            PathSegment::Close,
        ]);
        assert_eq!(d, "M 1 2 A 3 4 90 1 0 5 6 z");
    }

    #[test]
    fn image_keeps_mask_color_and_data_uri() {
        let mut shape = RasterShape::new(
            tri_from_rect(Rect::new(2.0, 3.0, 4.0, 5.0)),
            EmbeddedImage::png(vec![1, 2, 3]),
        );
        shape.mask_color = Some(Rgba::rgb(1, 2, 3));
        let element = build_image(&shape);
        assert_eq!(element.attr("x"), Some("2.0"));
        assert_eq!(element.attr("y"), Some("3.0"));
        assert_eq!(element.attr("width"), Some("4.0"));
        assert_eq!(element.attr("height"), Some("5.0"));
        assert_eq!(element.attr("faint:mask-color"), Some("rgb(1, 2, 3)"));
        assert_eq!(element.attr("transform"), None);
        assert!(element
            .attr("xlink:href")
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn rotated_image_gets_compact_rotate() {
        let tri = tri_from_rect(Rect::new(2.0, 3.0, 4.0, 5.0))
            .rotated(std::f64::consts::FRAC_PI_2, Point::new(2.0, 3.0));
        let shape = RasterShape::new(tri, EmbeddedImage::png(vec![1]));
        let element = build_image(&shape);
        assert_eq!(
            element.attr("transform"),
            Some("rotate(90.000000,2.000000,3.000000)")
        );
    }

    #[test]
    fn shape_name_becomes_trailing_id() {
        let mut shape = Shape::Rect(RectShape::new(
            tri_from_rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
            border_style(),
        ));
        shape.set_name("box");
        let element = build_shape(&shape, &mut SvgBuildState::new()).unwrap();
        let svg = element.to_svg().unwrap();
        assert!(svg.ends_with("id=\"box\"/>"));
    }

    #[test]
    fn group_wraps_children_in_order() {
        let style = border_style();
        let group = GroupShape::new(vec![
            Shape::Line(LineShape::new(
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                style.clone(),
            )),
            Shape::Polygon(PolygonShape::new(
                vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
                style,
            )),
        ]);
        let element = build_group(&group, &mut SvgBuildState::new());
        assert_eq!(element.name(), "g");
        assert_eq!(element.children().len(), 2);
        assert_eq!(element.children()[0].name(), "line");
        assert_eq!(element.children()[1].name(), "polygon");
    }
}
