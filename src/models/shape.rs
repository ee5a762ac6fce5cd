//! The shape objects a frame can contain.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::paint::EmbeddedImage;
use super::style::{FontStyle, HAlign, PaintStyle, VAlign};
use crate::geom::{self, bounding_rect, tri_from_rect, Matrix, Point, Rect, Tri};

/// One step of a path in absolute coordinates. `p` is the target point,
/// `c` and `d` the leading and trailing control points of a cubic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        p: Point,
        c: Point,
        d: Point,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        p: Point,
    },
    Close,
}

impl PathSegment {
    pub fn transformed(&self, m: &Matrix) -> PathSegment {
        match *self {
            PathSegment::MoveTo(p) => PathSegment::MoveTo(m.apply(p)),
            PathSegment::LineTo(p) => PathSegment::LineTo(m.apply(p)),
            PathSegment::CubicTo { p, c, d } => PathSegment::CubicTo {
                p: m.apply(p),
                c: m.apply(c),
                d: m.apply(d),
            },
            PathSegment::ArcTo {
                rx,
                ry,
                axis_rotation,
                large_arc,
                sweep,
                p,
            } => {
                // Radii and axis react to scale and rotation; shear is
                // approximated.
                let sx = (m.a * m.a + m.b * m.b).sqrt();
                let sy = (m.c * m.c + m.d * m.d).sqrt();
                PathSegment::ArcTo {
                    rx: rx * sx,
                    ry: ry * sy,
                    axis_rotation: axis_rotation + m.b.atan2(m.a),
                    large_arc,
                    sweep,
                    p: m.apply(p),
                }
            }
            PathSegment::Close => PathSegment::Close,
        }
    }

    fn points(&self) -> Vec<Point> {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => vec![p],
            PathSegment::CubicTo { p, c, d } => vec![p, c, d],
            PathSegment::ArcTo { p, .. } => vec![p],
            PathSegment::Close => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub name: Option<String>,
    pub tri: Tri,
    pub style: PaintStyle,
    /// Corner radii; zero means square corners.
    pub rx: f64,
    pub ry: f64,
}

impl RectShape {
    pub fn new(tri: Tri, style: PaintStyle) -> Self {
        RectShape {
            name: None,
            tri,
            style,
            rx: 0.0,
            ry: 0.0,
        }
    }

    pub fn rounded(&self) -> bool {
        self.rx != 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseShape {
    pub name: Option<String>,
    pub tri: Tri,
    pub style: PaintStyle,
}

impl EllipseShape {
    pub fn new(tri: Tri, style: PaintStyle) -> Self {
        EllipseShape {
            name: None,
            tri,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub name: Option<String>,
    pub p0: Point,
    pub p1: Point,
    pub style: PaintStyle,
}

impl LineShape {
    pub fn new(p0: Point, p1: Point, style: PaintStyle) -> Self {
        LineShape {
            name: None,
            p0,
            p1,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineShape {
    pub name: Option<String>,
    pub points: Vec<Point>,
    pub style: PaintStyle,
}

impl PolylineShape {
    pub fn new(points: Vec<Point>, style: PaintStyle) -> Self {
        PolylineShape {
            name: None,
            points,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub name: Option<String>,
    pub points: Vec<Point>,
    pub style: PaintStyle,
}

impl PolygonShape {
    pub fn new(points: Vec<Point>, style: PaintStyle) -> Self {
        PolygonShape {
            name: None,
            points,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub name: Option<String>,
    pub segments: Vec<PathSegment>,
    pub style: PaintStyle,
}

impl PathShape {
    pub fn new(segments: Vec<PathSegment>, style: PaintStyle) -> Self {
        PathShape {
            name: None,
            segments,
            style,
        }
    }
}

/// An editor spline through a list of control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineShape {
    pub name: Option<String>,
    pub points: Vec<Point>,
    pub style: PaintStyle,
}

impl SplineShape {
    pub fn new(points: Vec<Point>, style: PaintStyle) -> Self {
        SplineShape {
            name: None,
            points,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub name: Option<String>,
    pub tri: Tri,
    pub style: PaintStyle,
    pub font: FontStyle,
    /// The editor text, hard line breaks as `\n`.
    pub text: String,
    pub halign: HAlign,
    pub valign: VAlign,
    /// Wrapped inside the tri instead of free-flowing.
    pub bounded: bool,
    /// Evaluates expressions in the editor; the raw source round-trips.
    pub parsing: bool,
}

impl TextShape {
    pub fn new(tri: Tri, text: impl Into<String>, style: PaintStyle, font: FontStyle) -> Self {
        TextShape {
            name: None,
            tri,
            style,
            font,
            text: text.into(),
            halign: HAlign::Left,
            valign: VAlign::Top,
            bounded: true,
            parsing: false,
        }
    }

    /// Nominal height of one text row. Import and export share this
    /// approximation so baseline conversions cancel out.
    pub fn row_height(&self) -> f64 {
        self.font.size
    }

    /// Approximate advance width of a line.
    pub fn line_width(&self, line: &str) -> f64 {
        self.font.size * 0.6 * line.chars().count() as f64
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShape {
    pub name: Option<String>,
    pub shapes: Vec<Shape>,
}

impl GroupShape {
    pub fn new(shapes: Vec<Shape>) -> Self {
        GroupShape { name: None, shapes }
    }

    /// Bounding tri of the contained shapes.
    pub fn tri(&self) -> Tri {
        let mut points = Vec::new();
        for shape in &self.shapes {
            let b = shape.bounds();
            points.push(b.top_left());
            points.push(Point::new(b.x + b.w, b.y + b.h));
        }
        tri_from_rect(geom::points_bounds(&points))
    }
}

/// An embedded raster object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterShape {
    pub name: Option<String>,
    pub tri: Tri,
    pub style: PaintStyle,
    pub image: EmbeddedImage,
    /// Editor background-style metadata, carried verbatim.
    pub bg_style: Option<String>,
    /// Transparency key color, if the raster is masked.
    pub mask_color: Option<Rgba>,
}

impl RasterShape {
    pub fn new(tri: Tri, image: EmbeddedImage) -> Self {
        RasterShape {
            name: None,
            tri,
            style: PaintStyle::default(),
            image,
            bg_style: None,
            mask_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(RectShape),
    Ellipse(EllipseShape),
    Line(LineShape),
    Polyline(PolylineShape),
    Polygon(PolygonShape),
    Path(PathShape),
    Spline(SplineShape),
    Text(TextShape),
    Group(GroupShape),
    Raster(RasterShape),
}

impl Shape {
    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::Rect(s) => s.name.as_deref(),
            Shape::Ellipse(s) => s.name.as_deref(),
            Shape::Line(s) => s.name.as_deref(),
            Shape::Polyline(s) => s.name.as_deref(),
            Shape::Polygon(s) => s.name.as_deref(),
            Shape::Path(s) => s.name.as_deref(),
            Shape::Spline(s) => s.name.as_deref(),
            Shape::Text(s) => s.name.as_deref(),
            Shape::Group(s) => s.name.as_deref(),
            Shape::Raster(s) => s.name.as_deref(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = Some(name.into());
        match self {
            Shape::Rect(s) => s.name = name,
            Shape::Ellipse(s) => s.name = name,
            Shape::Line(s) => s.name = name,
            Shape::Polyline(s) => s.name = name,
            Shape::Polygon(s) => s.name = name,
            Shape::Path(s) => s.name = name,
            Shape::Spline(s) => s.name = name,
            Shape::Text(s) => s.name = name,
            Shape::Group(s) => s.name = name,
            Shape::Raster(s) => s.name = name,
        }
    }

    /// Axis-aligned bounds, used for group extents. Curve bounds include
    /// control points.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(s) => bounding_rect(&s.tri),
            Shape::Ellipse(s) => bounding_rect(&s.tri),
            Shape::Text(s) => bounding_rect(&s.tri),
            Shape::Raster(s) => bounding_rect(&s.tri),
            Shape::Line(s) => geom::points_bounds(&[s.p0, s.p1]),
            Shape::Polyline(s) => geom::points_bounds(&s.points),
            Shape::Polygon(s) => geom::points_bounds(&s.points),
            Shape::Spline(s) => geom::points_bounds(&s.points),
            Shape::Path(s) => {
                let points: Vec<Point> = s.segments.iter().flat_map(|seg| seg.points()).collect();
                geom::points_bounds(&points)
            }
            Shape::Group(s) => bounding_rect(&s.tri()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_tri_spans_children() {
        let style = PaintStyle::default();
        let group = GroupShape::new(vec![
            Shape::Line(LineShape::new(
                Point::new(0.0, 0.0),
                Point::new(10.0, 5.0),
                style.clone(),
            )),
            Shape::Rect(RectShape::new(
                tri_from_rect(Rect::new(5.0, 5.0, 10.0, 10.0)),
                style,
            )),
        ]);
        let tri = group.tri();
        assert_eq!(tri.p0(), Point::new(0.0, 0.0));
        assert_eq!(tri.p3(), Point::new(15.0, 15.0));
    }

    #[test]
    fn text_lines_split_on_hard_breaks() {
        let t = TextShape::new(
            Tri::default(),
            "one\ntwo\nthree",
            PaintStyle::default(),
            FontStyle::default(),
        );
        assert_eq!(t.lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn arc_transform_scales_radii() {
        let seg = PathSegment::ArcTo {
            rx: 2.0,
            ry: 3.0,
            axis_rotation: 0.0,
            large_arc: false,
            sweep: true,
            p: Point::new(1.0, 1.0),
        };
        let scaled = seg.transformed(&Matrix::scale(2.0, 4.0));
        match scaled {
            PathSegment::ArcTo { rx, ry, p, .. } => {
                assert_eq!(rx, 4.0);
                assert_eq!(ry, 12.0);
                assert_eq!(p, Point::new(2.0, 4.0));
            }
            other => panic!("not an arc: {:?}", other),
        }
    }
}
