//! RGBA colors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// An opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub fn black() -> Self {
        Rgba::rgb(0, 0, 0)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Scales the alpha channel by an opacity in [0, 1].
    pub fn faded(self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        self.with_alpha((self.a as f64 * opacity).round() as u8)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::black()
    }
}
