//! Batch certificate PDF generation
//!
//! Renders one PDF per input row: styled text fields word-wrapped and
//! centered over a background image, a row of captioned signature images
//! beneath, and the finished documents packaged into a ZIP archive. The page
//! is laid out in the background image's native pixel units.

pub mod batch;
pub mod canvas;
pub mod encoding;
pub mod error;
pub mod font;
pub mod input;
pub mod render;
pub mod text_layout;
pub mod types;

pub use error::{RenderError, RenderResult};
pub use render::{compose_certificate, render_fields, render_signature_row, ComposedDocument};
pub use types::{Color, FieldStyle, LayoutOptions, Record, StyleSheet};
