//! Plane geometry shared by the importer and the exporter.

pub mod matrix;
pub mod tri;

pub use matrix::Matrix;
pub use tri::{bounding_rect, tri_from_points, tri_from_rect, Tri};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle, positive sizes assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.x + self.w, self.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.y + self.h)
    }
}

/// A rectangle described by its center and half-axes, as used by the SVG
/// circle and ellipse elements.
pub fn center_based_rect(center: Point, rx: f64, ry: f64) -> Rect {
    Rect::new(center.x - rx, center.y - ry, rx * 2.0, ry * 2.0)
}

pub fn distance(p0: Point, p1: Point) -> f64 {
    ((p1.x - p0.x).powi(2) + (p1.y - p0.y).powi(2)).sqrt()
}

/// The direction of the line from p0 to p1, in radians.
pub fn line_angle(p0: Point, p1: Point) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

pub fn mid_point(p0: Point, p1: Point) -> Point {
    Point::new((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0)
}

/// `pt` moved `dist` along the direction given by `angle` (radians).
pub fn displaced(pt: Point, angle: f64, dist: f64) -> Point {
    Point::new(pt.x + angle.cos() * dist, pt.y + angle.sin() * dist)
}

pub fn rotate_point(pt: Point, angle: f64, origin: Point) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = pt.x - origin.x;
    let dy = pt.y - origin.y;
    Point::new(
        cos * dx - sin * dy + origin.x,
        sin * dx + cos * dy + origin.y,
    )
}

/// The tight axis-aligned bounds of a point set. Empty input yields a
/// degenerate rect at the origin.
pub fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}
