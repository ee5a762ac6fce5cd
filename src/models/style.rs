//! Shape style settings: fill mode, stroke parameters, fonts, alignment.

use serde::{Deserialize, Serialize};

use super::paint::Paint;

/// Which of the two paint slots apply. With `BorderFill`, `fg` strokes
/// and `bg` fills; with `Fill` alone, `fg` holds the fill paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    None,
    Border,
    Fill,
    BorderFill,
}

impl FillMode {
    pub fn has_border(&self) -> bool {
        matches!(self, FillMode::Border | FillMode::BorderFill)
    }

    pub fn has_fill(&self) -> bool {
        matches!(self, FillMode::Fill | FillMode::BorderFill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineCap {
    Flat,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    LongDash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arrow {
    None,
    Front,
    Back,
    Both,
}

impl Arrow {
    pub fn at_front(&self) -> bool {
        matches!(self, Arrow::Front | Arrow::Both)
    }

    pub fn at_back(&self) -> bool {
        matches!(self, Arrow::Back | Arrow::Both)
    }
}

/// The full paint-and-stroke state a shape carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintStyle {
    pub fill_mode: FillMode,
    /// Stroke paint, or the fill paint when only filling.
    pub fg: Paint,
    /// Fill paint when both stroking and filling.
    pub bg: Paint,
    pub line_width: f64,
    pub line_style: LineStyle,
    pub cap: LineCap,
    pub join: LineJoin,
    pub arrow: Arrow,
}

impl Default for PaintStyle {
    fn default() -> Self {
        PaintStyle {
            fill_mode: FillMode::Fill,
            fg: Paint::default(),
            bg: Paint::default(),
            line_width: 1.0,
            line_style: LineStyle::Solid,
            cap: LineCap::Flat,
            join: LineJoin::Miter,
            arrow: Arrow::None,
        }
    }
}

impl PaintStyle {
    /// The paint used for filling, if the mode fills at all.
    pub fn fill_paint(&self) -> Option<&Paint> {
        match self.fill_mode {
            FillMode::Fill => Some(&self.fg),
            FillMode::BorderFill => Some(&self.bg),
            _ => None,
        }
    }

    /// The paint used for stroking, if the mode strokes at all.
    pub fn stroke_paint(&self) -> Option<&Paint> {
        match self.fill_mode {
            FillMode::Border | FillMode::BorderFill => Some(&self.fg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle {
            family: "Arial".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}
