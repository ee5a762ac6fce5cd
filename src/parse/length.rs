//! Resolving SVG lengths and coordinates to user-space values.

use super::grammar::parse_length_literal;
use super::state::FrameProps;
use crate::error::{LoadError, LoadResult};

/// Which container span a percentage resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// User units per one unit of an absolute unit. Follows the CSS 2.0
/// reference pixel at 90dpi.
fn unit_factor(unit: &str) -> f64 {
    match unit {
        "pt" => 1.25,
        "pc" => 15.0,
        "mm" => 3.543307,
        "cm" => 35.543307,
        "in" => 90.0,
        // "" and "px"
        _ => 1.0,
    }
}

fn resolve(value: f64, unit: &str, full_span: f64, props: &FrameProps) -> f64 {
    match unit {
        "%" => value / 100.0 * full_span,
        "em" | "ex" => {
            // Font-relative units need a font context the importer
            // does not track.
            props.add_warning(format!("Unsupported unit: {}", unit));
            value
        }
        _ => value * unit_factor(unit),
    }
}

/// Parses a length attribute against an explicit percentage span.
pub fn svg_length_attr_dumb(
    value_str: &str,
    props: &FrameProps,
    full_span: f64,
) -> LoadResult<f64> {
    let (value, unit) = parse_length_literal(value_str)
        .ok_or_else(|| LoadError::InvalidLength(value_str.to_string()))?;
    Ok(resolve(value, unit, full_span, props))
}

/// Parses a coordinate attribute against an explicit percentage span.
pub fn svg_coord_attr_dumb(
    value_str: &str,
    props: &FrameProps,
    full_span: f64,
) -> LoadResult<f64> {
    let (value, unit) = parse_length_literal(value_str)
        .ok_or_else(|| LoadError::InvalidCoordinate(value_str.to_string()))?;
    Ok(resolve(value, unit, full_span, props))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> FrameProps {
        FrameProps::new(640, 480)
    }

    #[test]
    fn plain_and_px_pass_through() {
        let p = props();
        assert_eq!(svg_length_attr_dumb("640", &p, 100.0).unwrap(), 640.0);
        assert_eq!(svg_length_attr_dumb("640px", &p, 100.0).unwrap(), 640.0);
    }

    #[test]
    fn absolute_units_scale() {
        let p = props();
        assert_eq!(svg_length_attr_dumb("640pt", &p, 100.0).unwrap(), 800.0);
        assert_eq!(svg_length_attr_dumb("2in", &p, 100.0).unwrap(), 180.0);
        assert_eq!(svg_length_attr_dumb("1pc", &p, 100.0).unwrap(), 15.0);
    }

    #[test]
    fn percentages_resolve_against_span() {
        let p = props();
        assert_eq!(svg_length_attr_dumb("50%", &p, 640.0).unwrap(), 320.0);
        assert_eq!(svg_length_attr_dumb("0%", &p, 640.0).unwrap(), 0.0);
    }

    #[test]
    fn font_relative_units_warn_and_pass_through() {
        let p = props();
        assert_eq!(svg_length_attr_dumb("2em", &p, 100.0).unwrap(), 2.0);
        assert_eq!(p.warnings().len(), 1);
        assert!(p.warnings()[0].contains("Unsupported unit"));
    }

    #[test]
    fn malformed_lengths_are_fatal() {
        let p = props();
        assert!(matches!(
            svg_length_attr_dumb("12km", &p, 100.0),
            Err(LoadError::InvalidLength(_))
        ));
        assert!(matches!(
            svg_coord_attr_dumb("abc", &p, 100.0),
            Err(LoadError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn exponent_notation_parses() {
        let p = props();
        assert_eq!(
            svg_length_attr_dumb("-640.0E10", &p, 100.0).unwrap(),
            -640.0e10
        );
    }
}
