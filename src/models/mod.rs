//! The vector image model
//!
//! This module contains the document, frame, shape, paint and style
//! types that SVG import produces and export consumes.

pub mod color;
pub mod document;
pub mod paint;
pub mod shape;
pub mod style;

// Re-export commonly used types
pub use color::Rgba;
pub use document::*;
pub use paint::*;
pub use shape::*;
pub use style::*;
