//! Certificate page composition
//!
//! Two passes per document: the text block renderer draws each styled field
//! centered in a column 75% of the page width, advancing a vertical cursor
//! by the wrapped block's height, and the signature row layout distributes
//! up to three captioned images evenly below the final cursor position.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};
use crate::font::{self, TextMeasurer};
use crate::text_layout::LineBreaker;
use crate::types::{Color, LayoutOptions, Record, StyleSheet};

/// Fraction of the page width the text column occupies
pub const TEXT_COLUMN_RATIO: f64 = 0.75;
/// Vertical gap between the last text block and the signature row
pub const SIGNATURE_GAP: f64 = 20.0;
/// Vertical gap between a signature image and its caption
pub const CAPTION_GAP: f64 = 20.0;
/// Baseline offset from the top of a line box, as a fraction of the size
const BASELINE_RATIO: f64 = 0.8;

/// Origin and width of the centered text column for a page width
pub fn text_column(canvas_width: f64) -> (f64, f64) {
    let column_width = canvas_width * TEXT_COLUMN_RATIO;
    ((canvas_width - column_width) / 2.0, column_width)
}

/// Horizontal positions for `n` images of `image_width` spread evenly across
/// the page: equal gaps before the first, between each pair and after the
/// last image.
pub fn signature_slots(canvas_width: f64, image_width: f64, n: usize) -> Vec<f64> {
    let count = n as f64;
    let spacing = (canvas_width - image_width * count) / (count + 1.0);
    (0..n)
        .map(|i| spacing + i as f64 * (image_width + spacing))
        .collect()
}

/// Render every field present in both `record` and `styles`, in
/// `field_order`, each as a centered word-wrapped block. Returns the final
/// cursor position, the anchor for whatever is drawn next.
///
/// The wrapped lines are computed once and used for both the line count and
/// the draw, so measurement and drawing cannot diverge.
pub fn render_fields(
    canvas: &mut Canvas,
    record: &Record,
    field_order: &[String],
    styles: &StyleSheet,
    y_start: f64,
    line_height_multiplier: f64,
) -> RenderResult<f64> {
    let (column_x, column_width) = text_column(canvas.width());
    let breaker = LineBreaker::new(column_width);
    let mut y = y_start;

    for field in field_order {
        let (value, style) = match (record.get(field), styles.get(field)) {
            (Some(value), Some(style)) => (value, style),
            _ => continue,
        };

        let builtin = font::resolve(&style.family, &style.style)?;
        let size = f64::from(style.size);
        let line_height = size * line_height_multiplier;

        canvas.set_font(builtin, size);
        canvas.set_fill_color(style.color);

        let lines = breaker.break_text(value, &builtin, size);
        for (i, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let x = column_x + (column_width - line.width) / 2.0;
            let baseline = y + i as f64 * line_height + size * BASELINE_RATIO;
            canvas.draw_string(x, baseline, &line.text);
        }
        y += line_height * lines.len() as f64;
    }

    Ok(y)
}

/// Draw the signature row at `y_position`, each image captioned with its
/// file stem. A missing or unreadable image is skipped without shifting the
/// remaining slots; the failures are returned so the caller can report them.
pub fn render_signature_row(
    canvas: &mut Canvas,
    images: &[PathBuf],
    y_position: f64,
    image_width: f64,
    image_height: f64,
    caption_font_size: f64,
) -> Vec<RenderError> {
    if images.is_empty() {
        return Vec::new();
    }

    let slots = signature_slots(canvas.width(), image_width, images.len());
    let caption_font = font::caption_font();
    let mut failures = Vec::new();

    for (path, &x) in images.iter().zip(&slots) {
        let decoded = match image::open(path) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!("skipping signature image {}: {err}", path.display());
                failures.push(RenderError::ImageLoad {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        canvas.draw_image(&decoded, x, y_position, image_width, image_height);

        let caption = file_stem(path);
        canvas.set_font(caption_font, caption_font_size);
        canvas.set_fill_color(Color::BLACK);
        let caption_width = caption_font.measure_text(&caption, caption_font_size);
        let caption_x = x + (image_width - caption_width) / 2.0;
        let caption_y =
            y_position + image_height + CAPTION_GAP + caption_font_size * BASELINE_RATIO;
        canvas.draw_string(caption_x, caption_y, &caption);
    }

    failures
}

/// A finished document plus the non-fatal image failures encountered while
/// composing it
pub struct ComposedDocument {
    pub bytes: Vec<u8>,
    pub image_failures: Vec<RenderError>,
}

/// Compose one certificate: background at native pixel size, text blocks,
/// then the signature row below the final cursor.
pub fn compose_certificate(
    background: &DynamicImage,
    record: &Record,
    field_order: &[String],
    styles: &StyleSheet,
    signatures: &[PathBuf],
    opts: &LayoutOptions,
) -> RenderResult<ComposedDocument> {
    let mut canvas = Canvas::new(f64::from(background.width()), f64::from(background.height()));
    canvas.draw_background(background);

    let y_end = render_fields(
        &mut canvas,
        record,
        field_order,
        styles,
        opts.y_start,
        opts.line_height_multiplier,
    )?;

    let side = opts.signature_box();
    let image_failures = render_signature_row(
        &mut canvas,
        signatures,
        y_end + SIGNATURE_GAP,
        side,
        side,
        f64::from(opts.caption_size),
    );

    Ok(ComposedDocument {
        bytes: canvas.finish()?,
        image_failures,
    })
}

/// Caption for a signature image: filename without directory or extension
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
