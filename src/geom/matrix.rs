//! 2D affine transformation matrix.

use serde::{Deserialize, Serialize};

use super::Point;

/// An affine transform
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn skew_x(tan: f64) -> Self {
        Matrix::new(1.0, 0.0, tan, 1.0, 0.0, 0.0)
    }

    pub fn skew_y(tan: f64) -> Self {
        Matrix::new(1.0, tan, 0.0, 1.0, 0.0, 0.0)
    }

    /// Rotation around a pivot point.
    pub fn rotation(radians: f64, pivot: Point) -> Self {
        let (sin, cos) = radians.sin_cos();
        Matrix::new(
            cos,
            sin,
            -sin,
            cos,
            pivot.x - cos * pivot.x + sin * pivot.y,
            pivot.y - sin * pivot.x - cos * pivot.y,
        )
    }

    /// Composes so that applying the product equals applying `other` first,
    /// then `self`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix::new(
            self.a * other.a + self.c * other.b,
            self.b * other.a + self.d * other.b,
            self.a * other.c + self.c * other.d,
            self.b * other.c + self.d * other.d,
            self.a * other.e + self.c * other.f + self.e,
            self.b * other.e + self.d * other.f + self.f,
        )
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}
