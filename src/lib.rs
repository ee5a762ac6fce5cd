//! SVG interchange for Faint documents.
//!
//! Reads an SVG 1.1 subset into a [`Document`] of frames and shapes,
//! and writes documents back out as SVG. Editor-only state that plain
//! SVG cannot express (tris, splines, text boxes, calibration) rides
//! along in `faint:` namespaced markup so documents survive a round
//! trip through the format.

pub mod error;
pub mod geom;
pub mod models;
pub mod parse;
pub mod renderers;

pub use error::{LoadError, LoadResult, SaveError, SaveResult};
pub use models::Document;
pub use parse::{parse_svg_file, parse_svg_string};
pub use renderers::{to_svg_string, write_svg_file};
