//! Lexical helpers for SVG attribute microsyntaxes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;

use super::XmlNode;
use crate::error::{LoadError, LoadResult};
use crate::geom::Point;
use crate::models::ImageFormat;

lazy_static! {
    /// An SVG length: number plus optional unit, nothing else.
    static ref LENGTH: Regex = Regex::new(
        r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)(em|ex|px|in|cm|mm|pt|pc|%)?$"
    ).unwrap();

    /// A percentage literal, as used by gradient stop offsets.
    static ref PERCENTAGE: Regex = Regex::new(
        r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)%"
    ).unwrap();

    /// A bare number (gradient stop ratio offsets).
    static ref NUMBER: Regex = Regex::new(
        r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?"
    ).unwrap();

    /// One entry of a transform list: name and parenthesized arguments.
    static ref TRANSFORM_OP: Regex = Regex::new(r"([a-zA-Z]+)\s*\(([^)]*)\)").unwrap();

    /// An in-document `url(#id)` paint reference.
    static ref URL_REFERENCE: Regex = Regex::new(r"^url\(\s*#([^)\s]+)\s*\)").unwrap();
}

/// Splits a length literal into value and unit. The unit is empty for
/// plain user-space numbers. Returns None for anything the length
/// grammar does not cover, including unknown units.
pub fn parse_length_literal(s: &str) -> Option<(f64, &str)> {
    let caps = LENGTH.captures(s.trim())?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2).map_or("", |m| m.as_str());
    Some((value, unit))
}

/// Parses a gradient stop offset: `NN%` or a bare ratio.
pub fn parse_stop_offset(s: &str) -> LoadResult<f64> {
    if let Some(caps) = PERCENTAGE.captures(s) {
        if let Ok(pct) = caps[1].parse::<f64>() {
            return Ok(pct / 100.0);
        }
    }
    if let Some(m) = NUMBER.find(s) {
        if let Ok(ratio) = m.as_str().parse::<f64>() {
            return Ok(ratio);
        }
    }
    Err(LoadError::InvalidStopOffset(s.to_string()))
}

/// Parses a point list (the `points` attribute and `faint:tri`,
/// SVG 1.1 9.7.1) into flat coordinates. Commas and whitespace
/// separate; a `-` also starts a new coordinate.
pub fn parse_points(points_str: &str) -> LoadResult<Vec<f64>> {
    let spaced = points_str.replace('-', " -");
    let mut coords = Vec::new();
    for token in spaced.split(|c: char| c.is_ascii_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let value: f64 = token
            .parse()
            .map_err(|_| LoadError::InvalidCoordinate(token.to_string()))?;
        coords.push(value);
    }
    Ok(coords)
}

/// Pairs flat coordinates into points, dropping an odd trailing value.
pub fn pair_points(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

/// Iterates `name(args)` entries of a transform attribute.
pub fn transform_ops(attr: &str) -> impl Iterator<Item = (&str, &str)> {
    TRANSFORM_OP.captures_iter(attr).map(|caps| {
        let op = caps.get(1).map_or("", |m| m.as_str());
        let args = caps.get(2).map_or("", |m| m.as_str());
        (op, args)
    })
}

/// The id part of an in-document `url(#id)` reference.
pub fn extract_url_reference(ref_string: &str) -> Option<&str> {
    URL_REFERENCE
        .captures(ref_string)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The id part of a same-document `xlink:href` value.
pub fn extract_local_href(ref_string: &str) -> Option<&str> {
    ref_string.strip_prefix('#')
}

/// The node id formatted for warning messages, or an empty string.
pub fn maybe_id_ref(node: XmlNode) -> String {
    match node.attribute("id") {
        Some(id) => format!(" (id={})", id),
        None => String::new(),
    }
}

const BASE64_PNG_PREFIX: &str = "data:image/png;base64,";
const BASE64_JPEG_PREFIX: &str = "data:image/jpeg;base64,";

/// Decodes a base64 data URI into an image format and the raw encoded
/// bytes. Returns None for schemes and media types not carried by the
/// editor, and for undecodable payloads.
pub fn parse_embedded_image_data(image_string: &str) -> Option<(ImageFormat, Vec<u8>)> {
    let (format, payload) = if let Some(rest) = image_string.strip_prefix(BASE64_PNG_PREFIX) {
        (ImageFormat::Png, rest)
    } else if let Some(rest) = image_string.strip_prefix(BASE64_JPEG_PREFIX) {
        (ImageFormat::Jpeg, rest)
    } else {
        return None;
    };
    // XML serializers may wrap the payload; the decoder will not.
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    match BASE64.decode(cleaned.as_bytes()) {
        Ok(data) => Some((format, data)),
        Err(err) => {
            log::debug!("undecodable embedded image data: {}", err);
            None
        }
    }
}
