//! Three-point oriented boxes.
//!
//! A `Tri` positions a shape by three corners of its bounding
//! parallelogram: p0 (top left), p1 (top right) and p2 (bottom left).
//! This encodes position, size, rotation and horizontal skew in one
//! value; the fourth corner is derived.

use serde::{Deserialize, Serialize};

use super::{distance, line_angle, rotate_point, Matrix, Point, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tri {
    p0: Point,
    p1: Point,
    p2: Point,
}

pub fn tri_from_points(p0: Point, p1: Point, p2: Point) -> Tri {
    Tri { p0, p1, p2 }
}

pub fn tri_from_rect(r: Rect) -> Tri {
    tri_from_points(r.top_left(), r.top_right(), r.bottom_left())
}

impl Tri {
    pub fn p0(&self) -> Point {
        self.p0
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn p3(&self) -> Point {
        let dx = self.width();
        let angle = self.angle();
        self.p2 + Point::new(dx * angle.cos(), dx * angle.sin())
    }

    /// The direction of the p0-p1 edge, in radians.
    pub fn angle(&self) -> f64 {
        line_angle(self.p0, self.p1)
    }

    pub fn width(&self) -> f64 {
        distance(self.p0, self.p1)
    }

    /// Distance from p0 to p2, negated when the tri is mirrored so that
    /// p2 lies on the far side of the p0-p1 edge.
    pub fn height(&self) -> f64 {
        let angle2 = line_angle(self.p0, self.p2);
        let angle3 = self.angle() + std::f64::consts::FRAC_PI_2;
        let h = distance(self.p0, self.p2);
        if (angle2.sin() - angle3.sin()).abs() > 0.1 {
            -h
        } else if (angle2.cos() - angle3.cos()).abs() > 0.1 {
            -h
        } else {
            h
        }
    }

    /// Horizontal displacement of p0 relative to p2 once the rotation is
    /// undone, i.e. how slanted the left edge is.
    pub fn skew(&self) -> f64 {
        let p0 = rotate_point(self.p0, -self.angle(), self.p2);
        p0.x - self.p2.x
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Tri {
        let off = Point::new(dx, dy);
        tri_from_points(self.p0 + off, self.p1 + off, self.p2 + off)
    }

    pub fn rotated(&self, radians: f64, origin: Point) -> Tri {
        tri_from_points(
            rotate_point(self.p0, radians, origin),
            rotate_point(self.p1, radians, origin),
            rotate_point(self.p2, radians, origin),
        )
    }

    /// Offset along the tri's own axes: dx along the p0-p1 edge, dy along
    /// the p0-p2 edge.
    pub fn offset_aligned(&self, dx: f64, dy: f64) -> Tri {
        let a1 = line_angle(self.p0, self.p1);
        let t = self.translated(dx * a1.cos(), dx * a1.sin());
        let a2 = line_angle(t.p0, t.p2);
        t.translated(dy * a2.cos(), dy * a2.sin())
    }

    pub fn transformed(&self, m: &Matrix) -> Tri {
        tri_from_points(m.apply(self.p0), m.apply(self.p1), m.apply(self.p2))
    }
}

/// Axis-aligned bounds of all four corners.
pub fn bounding_rect(tri: &Tri) -> Rect {
    super::points_bounds(&[tri.p0(), tri.p1(), tri.p2(), tri.p3()])
}
