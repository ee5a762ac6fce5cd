//! SVG output.
//!
//! The writers build an [`SvgElement`](tree::SvgElement) tree from the
//! document model and serialize it once at the end. Defs referenced by
//! shapes are collected along the way in a
//! [`SvgBuildState`](defs::SvgBuildState).

pub mod defs;
pub mod document;
pub mod elements;
pub mod style;
pub mod text;
pub mod tree;

pub use document::{to_svg_string, write_svg_file};
