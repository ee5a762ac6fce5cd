//! Parsing SVG transform attributes into matrices.

use super::grammar::transform_ops;
use crate::error::{LoadError, LoadResult};
use crate::geom::{Matrix, Point};

fn parse_args(args_str: &str) -> Option<Vec<f64>> {
    args_str
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect()
}

fn parse_transform(op: &str, args_str: &str) -> LoadResult<Matrix> {
    let bad = || LoadError::InvalidTransform(format!("{}({})", op, args_str));
    let args = parse_args(args_str).ok_or_else(bad)?;
    let matrix = match (op, args.as_slice()) {
        ("translate", [x]) => Matrix::translation(*x, 0.0),
        ("translate", [x, y]) => Matrix::translation(*x, *y),
        ("scale", [s]) => Matrix::scale(*s, *s),
        ("scale", [sx, sy]) => Matrix::scale(*sx, *sy),
        ("rotate", [deg]) => Matrix::rotation(deg.to_radians(), Point::new(0.0, 0.0)),
        ("rotate", [deg, cx, cy]) => {
            Matrix::rotation(deg.to_radians(), Point::new(*cx, *cy))
        }
        ("skewX", [deg]) => Matrix::skew_x(deg.to_radians().tan()),
        ("skewY", [deg]) => Matrix::skew_y(deg.to_radians().tan()),
        ("matrix", [a, b, c, d, e, f]) => Matrix::new(*a, *b, *c, *d, *e, *f),
        _ => return Err(bad()),
    };
    Ok(matrix)
}

/// Parses an SVG transform attribute into one matrix per entry.
pub fn parse_transform_list(attr: &str) -> LoadResult<Vec<Matrix>> {
    let mut transforms = Vec::new();
    for (op, args) in transform_ops(attr) {
        transforms.push(parse_transform(op, args)?);
    }
    Ok(transforms)
}

/// Applies a transform list to a matrix, leftmost transform outermost.
pub fn apply_transforms(transforms: &[Matrix], matrix: &Matrix) -> Matrix {
    let folded = transforms
        .iter()
        .fold(Matrix::identity(), |acc, t| acc.multiply(t));
    matrix.multiply(&folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9, "x: {} != {}", p.x, x);
        assert!((p.y - y).abs() < 1e-9, "y: {} != {}", p.y, y);
    }

    #[test]
    fn translate_defaults_y_to_zero() {
        let t = parse_transform_list("translate(10)").unwrap();
        assert_close(t[0].apply(Point::new(1.0, 2.0)), 11.0, 2.0);
    }

    #[test]
    fn scale_defaults_to_uniform() {
        let t = parse_transform_list("scale(3)").unwrap();
        assert_close(t[0].apply(Point::new(2.0, 5.0)), 6.0, 15.0);
    }

    #[test]
    fn rotate_about_pivot() {
        let t = parse_transform_list("rotate(90, 10, 10)").unwrap();
        assert_close(t[0].apply(Point::new(20.0, 10.0)), 10.0, 20.0);
    }

    #[test]
    fn skew_x_shifts_by_tangent() {
        let t = parse_transform_list("skewX(45)").unwrap();
        assert_close(t[0].apply(Point::new(0.0, 1.0)), 1.0, 1.0);
    }

    #[test]
    fn matrix_uses_all_six_terms() {
        let t = parse_transform_list("matrix(1 0 0 1 5 6)").unwrap();
        assert_close(t[0].apply(Point::new(0.0, 0.0)), 5.0, 6.0);
    }

    #[test]
    fn list_applies_left_to_right() {
        let transforms = parse_transform_list("translate(10, 0) scale(2)").unwrap();
        let m = apply_transforms(&transforms, &Matrix::identity());
        assert_close(m.apply(Point::new(1.0, 1.0)), 12.0, 2.0);
    }

    #[test]
    fn bad_arity_is_rejected() {
        assert!(matches!(
            parse_transform_list("rotate(1, 2)"),
            Err(LoadError::InvalidTransform(_))
        ));
        assert!(matches!(
            parse_transform_list("matrix(1, 2, 3)"),
            Err(LoadError::InvalidTransform(_))
        ));
    }

    #[test]
    fn unknown_ops_are_rejected() {
        assert!(matches!(
            parse_transform_list("frob(1)"),
            Err(LoadError::InvalidTransform(_))
        ));
    }

    #[test]
    fn unparsable_arguments_are_rejected() {
        assert!(matches!(
            parse_transform_list("scale(wide)"),
            Err(LoadError::InvalidTransform(_))
        ));
    }
}
