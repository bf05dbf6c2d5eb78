//! Error types for certificate rendering
//!
//! Per-document failures (fonts) abort only the affected document, per-image
//! failures are isolated inside the signature row, and configuration errors
//! abort the whole batch before any rendering starts.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for certificate generation
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested font family/style has no built-in equivalent. Fatal to
    /// the document: substituting a font would corrupt measured line counts.
    #[error("unsupported font: family '{family}', style '{style}'")]
    UnsupportedFont { family: String, style: String },

    /// A signature image could not be read or decoded. Recoverable: the slot
    /// is skipped and the rest of the row is drawn.
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    /// The style configuration is malformed or inconsistent with the input
    /// schema. Fatal to the whole batch, raised before any rendering.
    #[error("invalid style configuration: {0}")]
    InvalidStyleConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("style sheet JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
