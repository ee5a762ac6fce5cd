//! Parsing SVG path definition attributes.
//!
//! Produces absolute segments only. Horizontal and vertical lines
//! become plain lines, quadratic curves are elevated to cubics.

use crate::error::{LoadError, LoadResult};
use crate::geom::Point;
use crate::models::PathSegment;

struct PathLexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> PathLexer<'a> {
    fn new(text: &'a str) -> Self {
        PathLexer { text, pos: 0 }
    }

    fn error(&self) -> LoadError {
        let remainder: String = self.text[self.pos..].chars().take(20).collect();
        if remainder.is_empty() {
            LoadError::InvalidPathData("unexpected end of data".to_string())
        } else {
            LoadError::InvalidPathData(remainder)
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn skip_separators(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_whitespace() || bytes[self.pos] == b',')
        {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_separators();
        self.bytes().get(self.pos).copied()
    }

    /// Reads one number. Stops at a second decimal point, so "1.5.5"
    /// lexes as 1.5 followed by 0.5.
    fn number(&mut self) -> LoadResult<f64> {
        self.skip_separators();
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = self.pos;

        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut has_digits = i > int_start;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            has_digits = has_digits || i > frac_start;
        }
        if !has_digits {
            return Err(self.error());
        }
        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > exp_start {
                i = j;
            }
        }

        let token = &self.text[start..i];
        self.pos = i;
        token
            .parse::<f64>()
            .map_err(|_| LoadError::InvalidPathData(token.to_string()))
    }

    fn point(&mut self) -> LoadResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    /// Arc flags are a single 0 or 1, possibly without separators.
    fn flag(&mut self) -> LoadResult<bool> {
        self.skip_separators();
        let flag = match self.bytes().get(self.pos) {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(self.error()),
        };
        self.pos += 1;
        Ok(flag)
    }
}

/// Rewrites a quadratic curve from `p0` through control `q` to `p` as
/// an equivalent cubic.
fn elevate_quadratic(p0: Point, q: Point, p: Point) -> (Point, Point) {
    let c = Point::new(
        p0.x + 2.0 / 3.0 * (q.x - p0.x),
        p0.y + 2.0 / 3.0 * (q.y - p0.y),
    );
    let d = Point::new(p.x + 2.0 / 3.0 * (q.x - p.x), p.y + 2.0 / 3.0 * (q.y - p.y));
    (c, d)
}

fn reflect(origin: Point, p: Point) -> Point {
    Point::new(2.0 * origin.x - p.x, 2.0 * origin.y - p.y)
}

/// Parses a path definition attribute into absolute segments.
pub fn parse_path_data(definition: &str) -> LoadResult<Vec<PathSegment>> {
    let mut lexer = PathLexer::new(definition);
    let mut segments = Vec::new();

    let mut current = Point::new(0.0, 0.0);
    let mut subpath_start = current;
    // Control points that smooth curve commands reflect.
    let mut prev_cubic_ctrl: Option<Point> = None;
    let mut prev_quad_ctrl: Option<Point> = None;
    // Command repeated when numbers follow without a new letter.
    let mut pending: Option<char> = None;

    while let Some(next) = lexer.peek() {
        let command = if next.is_ascii_alphabetic() {
            lexer.pos += 1;
            next as char
        } else if let Some(repeat) = pending {
            repeat
        } else {
            return Err(lexer.error());
        };

        pending = match command {
            'M' => Some('L'),
            'm' => Some('l'),
            'Z' | 'z' => None,
            other => Some(other),
        };

        let relative = command.is_ascii_lowercase();
        let offset = if relative {
            current
        } else {
            Point::new(0.0, 0.0)
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match command.to_ascii_uppercase() {
            'M' => {
                let p = lexer.point()? + offset;
                segments.push(PathSegment::MoveTo(p));
                current = p;
                subpath_start = p;
            }
            'L' => {
                let p = lexer.point()? + offset;
                segments.push(PathSegment::LineTo(p));
                current = p;
            }
            'H' => {
                let x = lexer.number()? + offset.x;
                let p = Point::new(x, current.y);
                segments.push(PathSegment::LineTo(p));
                current = p;
            }
            'V' => {
                let y = lexer.number()? + offset.y;
                let p = Point::new(current.x, y);
                segments.push(PathSegment::LineTo(p));
                current = p;
            }
            'C' => {
                let c = lexer.point()? + offset;
                let d = lexer.point()? + offset;
                let p = lexer.point()? + offset;
                segments.push(PathSegment::CubicTo { p, c, d });
                cubic_ctrl = Some(d);
                current = p;
            }
            'S' => {
                let c = match prev_cubic_ctrl {
                    Some(prev) => reflect(current, prev),
                    None => current,
                };
                let d = lexer.point()? + offset;
                let p = lexer.point()? + offset;
                segments.push(PathSegment::CubicTo { p, c, d });
                cubic_ctrl = Some(d);
                current = p;
            }
            'Q' => {
                let q = lexer.point()? + offset;
                let p = lexer.point()? + offset;
                let (c, d) = elevate_quadratic(current, q, p);
                segments.push(PathSegment::CubicTo { p, c, d });
                quad_ctrl = Some(q);
                current = p;
            }
            'T' => {
                let q = match prev_quad_ctrl {
                    Some(prev) => reflect(current, prev),
                    None => current,
                };
                let p = lexer.point()? + offset;
                let (c, d) = elevate_quadratic(current, q, p);
                segments.push(PathSegment::CubicTo { p, c, d });
                quad_ctrl = Some(q);
                current = p;
            }
            'A' => {
                let rx = lexer.number()?.abs();
                let ry = lexer.number()?.abs();
                let axis_rotation = lexer.number()?.to_radians();
                let large_arc = lexer.flag()?;
                let sweep = lexer.flag()?;
                let p = lexer.point()? + offset;
                segments.push(PathSegment::ArcTo {
                    rx,
                    ry,
                    axis_rotation,
                    large_arc,
                    sweep,
                    p,
                });
                current = p;
            }
            'Z' => {
                segments.push(PathSegment::Close);
                current = subpath_start;
            }
            _ => return Err(LoadError::InvalidPathData(command.to_string())),
        }
        prev_cubic_ctrl = cubic_ctrl;
        prev_quad_ctrl = quad_ctrl;
    }

    Ok(segments)
}
