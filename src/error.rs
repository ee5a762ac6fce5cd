//! Error types for SVG import and export.

use thiserror::Error;

/// Fatal import failures. Recoverable defects become warnings on the
/// document instead (see `Document::warnings`).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("root element is not <svg>")]
    NotSvg,

    #[error("invalid SVG markup: {0}")]
    Markup(String),

    #[error("XML parser failure: {0}")]
    Xml(roxmltree::Error),

    #[error("invalid length: {0:?}")]
    InvalidLength(String),

    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    #[error("invalid transform: {0:?}")]
    InvalidTransform(String),

    #[error("invalid path data: {0:?}")]
    InvalidPathData(String),

    #[error("invalid gradient offset: {0:?}")]
    InvalidStopOffset(String),

    #[error("circular gradient reference involving \"{0}\"")]
    GradientCycle(String),

    #[error("SVG element has invalid size: {0}x{1}")]
    InvalidSize(f64, f64),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal export failures.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("document has no frames")]
    EmptyDocument,

    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
pub type SaveResult<T> = Result<T, SaveError>;
