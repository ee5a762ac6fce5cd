//! Documents and frames.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::paint::EmbeddedImage;
use super::shape::Shape;
use crate::geom::Point;

/// Frame backdrop: either a flat color or a full raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Color(Rgba),
    Image(EmbeddedImage),
}

/// A measurement calibration line mapping pixel distance to a physical
/// length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub start: Point,
    pub end: Point,
    pub length: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<Shape>,
    pub background: Option<Background>,
    pub calibration: Option<Calibration>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Frame {
            width,
            height,
            shapes: Vec::new(),
            background: None,
            calibration: None,
        }
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = Some(background);
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = Some(calibration);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub frames: Vec<Frame>,
    /// Recoverable defects collected while importing.
    pub warnings: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn add_frame(&mut self, width: u32, height: u32) -> &mut Frame {
        self.frames.push(Frame::new(width, height));
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn add_warning(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    pub fn first_frame(&self) -> Option<&Frame> {
        self.frames.first()
    }
}
