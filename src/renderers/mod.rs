//! Output renderers.
//!
//! Currently only SVG; the document model keeps renderers behind this
//! module so other formats can slot in beside it.

pub mod svg;

pub use svg::{to_svg_string, write_svg_file};
