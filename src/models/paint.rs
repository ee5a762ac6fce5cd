//! Paints: solid colors, gradients, raster patterns.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use crate::geom::Point;

/// One gradient stop. Offsets are kept in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    /// Direction in radians, 0 pointing right.
    pub angle: f64,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(angle: f64, stops: Vec<ColorStop>) -> Self {
        LinearGradient { angle, stops }
    }

    /// Stops ordered by offset, as the SVG serialization requires.
    pub fn sorted_stops(&self) -> Vec<ColorStop> {
        sorted_stops(&self.stops)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    /// Center and radii in object-relative units.
    pub center: Point,
    pub radii: (f64, f64),
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// A gradient with default geometry, as imported documents carry no
    /// radial geometry of their own.
    pub fn from_stops(stops: Vec<ColorStop>) -> Self {
        RadialGradient {
            center: Point::new(0.5, 0.5),
            radii: (0.5, 0.5),
            stops,
        }
    }

    pub fn sorted_stops(&self) -> Vec<ColorStop> {
        sorted_stops(&self.stops)
    }
}

fn sorted_stops(stops: &[ColorStop]) -> Vec<ColorStop> {
    let mut out = stops.to_vec();
    out.sort_by(|s1, s2| s1.offset.total_cmp(&s2.offset));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// An encoded raster image carried opaquely; this crate never decodes
/// pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    pub fn png(data: Vec<u8>) -> Self {
        EmbeddedImage {
            format: ImageFormat::Png,
            data,
        }
    }

    pub fn jpeg(data: Vec<u8>) -> Self {
        EmbeddedImage {
            format: ImageFormat::Jpeg,
            data,
        }
    }
}

/// A raster tile used as fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub tile: EmbeddedImage,
    /// Anchored to the filled object rather than the canvas.
    pub object_aligned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Color(Rgba),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    Pattern(Pattern),
}

impl Paint {
    /// Scales the paint's alpha by an opacity in [0, 1]. Gradients and
    /// patterns are unaffected.
    pub fn faded(self, opacity: f64) -> Paint {
        match self {
            Paint::Color(c) => Paint::Color(c.faded(opacity)),
            other => other,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, Paint::Color(_))
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Paint {
        Paint::Color(c)
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color(Rgba::black())
    }
}
