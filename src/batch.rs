//! Batch generation and packaging
//!
//! Documents are composed strictly sequentially, one fresh canvas and cursor
//! per record, and collected as in-memory buffers until packaging. Style
//! configuration is validated before any rendering starts; a font failure
//! aborts only its document, and a document that fails is never packaged.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use image::DynamicImage;

use crate::error::{RenderError, RenderResult};
use crate::input::Table;
use crate::render::compose_certificate;
use crate::types::{LayoutOptions, StyleSheet};

/// Everything the pipeline needs besides the input table and background
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub styles: StyleSheet,
    pub signatures: Vec<PathBuf>,
    /// Field whose value names each output document
    pub name_field: String,
    pub layout: LayoutOptions,
}

/// A per-record failure, identified by the record's name-field value
#[derive(Debug)]
pub struct DocumentFailure {
    pub record_name: String,
    pub error: RenderError,
}

/// Result of a batch run: finished documents plus everything that went wrong
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// (filename, PDF bytes) in input order
    pub documents: Vec<(String, Vec<u8>)>,
    /// Records whose document was aborted
    pub failures: Vec<DocumentFailure>,
    /// Non-fatal signature image failures, per record
    pub image_failures: Vec<DocumentFailure>,
}

/// Pre-flight validation, run before any document is rendered. Any error
/// here aborts the whole batch.
pub fn validate(config: &BatchConfig, schema: &[String], canvas_width: f64) -> RenderResult<()> {
    if config.styles.is_empty() {
        return Err(RenderError::InvalidStyleConfig(
            "style sheet is empty; no field would be rendered".to_string(),
        ));
    }
    config.styles.validate(schema)?;

    if !schema.iter().any(|field| field == &config.name_field) {
        return Err(RenderError::InvalidStyleConfig(format!(
            "name field '{}' does not exist in the input schema",
            config.name_field
        )));
    }

    let n = config.signatures.len();
    if n > 3 {
        return Err(RenderError::InvalidStyleConfig(format!(
            "{n} signature images given, at most 3 are supported"
        )));
    }
    // Reject geometry that would make the inter-image spacing negative
    let row_width = config.layout.signature_box() * n as f64;
    if n > 0 && row_width > canvas_width {
        return Err(RenderError::InvalidStyleConfig(format!(
            "signature row ({row_width} units) is wider than the page ({canvas_width} units)"
        )));
    }

    Ok(())
}

/// Generate one document per record. Fatal per-document errors are recorded
/// and the batch continues with the remaining records.
pub fn generate(
    background: &DynamicImage,
    table: &Table,
    config: &BatchConfig,
) -> RenderResult<BatchOutcome> {
    validate(config, &table.schema, f64::from(background.width()))?;

    let mut outcome = BatchOutcome::default();
    for record in &table.records {
        let name = record
            .get(&config.name_field)
            .cloned()
            .unwrap_or_default();

        match compose_certificate(
            background,
            record,
            &table.schema,
            &config.styles,
            &config.signatures,
            &config.layout,
        ) {
            Ok(document) => {
                for error in document.image_failures {
                    log::warn!("'{name}': {error}");
                    outcome.image_failures.push(DocumentFailure {
                        record_name: name.clone(),
                        error,
                    });
                }
                log::debug!("rendered '{name}' ({} bytes)", document.bytes.len());
                outcome.documents.push((format!("{name}.pdf"), document.bytes));
            }
            Err(error) => {
                log::error!("skipping document for '{name}': {error}");
                outcome.failures.push(DocumentFailure {
                    record_name: name,
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

/// Bundle finished documents into one in-memory ZIP archive
pub fn package_zip(documents: &[(String, Vec<u8>)]) -> RenderResult<Vec<u8>> {
    let mut data = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut data));
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);
        for (name, bytes) in documents {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, FieldStyle};

    fn table() -> Table {
        crate::input::read_records(
            "nombre,fecha\nAna Ruiz,01/01/2024\nJosé Pérez,02/01/2024\n".as_bytes(),
        )
        .unwrap()
    }

    fn config(family: &str) -> BatchConfig {
        let mut styles = StyleSheet::default();
        for field in ["nombre", "fecha"] {
            styles.0.insert(
                field.to_string(),
                FieldStyle {
                    size: 35,
                    family: family.to_string(),
                    style: String::new(),
                    color: Color::BLACK,
                },
            );
        }
        BatchConfig {
            styles,
            signatures: Vec::new(),
            name_field: "nombre".to_string(),
            layout: LayoutOptions::default(),
        }
    }

    #[test]
    fn validate_rejects_missing_name_field() {
        let mut cfg = config("Arial");
        cfg.name_field = "alumno".to_string();
        assert!(matches!(
            validate(&cfg, &table().schema, 1650.0),
            Err(RenderError::InvalidStyleConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_oversized_signature_row() {
        let mut cfg = config("Arial");
        cfg.signatures = vec![
            PathBuf::from("a.png"),
            PathBuf::from("b.png"),
            PathBuf::from("c.png"),
        ];
        // three 130-unit boxes do not fit a 300-unit page
        assert!(matches!(
            validate(&cfg, &table().schema, 300.0),
            Err(RenderError::InvalidStyleConfig(_))
        ));
        // but fit a full-size one
        assert!(validate(&cfg, &table().schema, 1650.0).is_ok());
    }

    #[test]
    fn validate_rejects_empty_style_sheet() {
        let mut cfg = config("Arial");
        cfg.styles = StyleSheet::default();
        assert!(matches!(
            validate(&cfg, &table().schema, 1650.0),
            Err(RenderError::InvalidStyleConfig(_))
        ));
    }

    #[test]
    fn generate_produces_one_document_per_record() {
        let background = DynamicImage::new_rgb8(400, 300);
        let outcome = generate(&background, &table(), &config("Arial")).unwrap();
        assert_eq!(outcome.documents.len(), 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.documents[0].0, "Ana Ruiz.pdf");
        assert_eq!(outcome.documents[1].0, "José Pérez.pdf");
        for (_, bytes) in &outcome.documents {
            assert!(bytes.starts_with(b"%PDF-"));
        }
    }

    #[test]
    fn font_failure_skips_only_the_affected_documents() {
        let background = DynamicImage::new_rgb8(400, 300);
        let outcome = generate(&background, &table(), &config("Papyrus")).unwrap();
        // every record uses the bad style here, so all fail and none package
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].record_name, "Ana Ruiz");
        assert!(matches!(
            outcome.failures[0].error,
            RenderError::UnsupportedFont { .. }
        ));
    }

    #[test]
    fn package_zip_round_trips() {
        let documents = vec![
            ("Ana Ruiz.pdf".to_string(), b"%PDF-1.7 fake".to_vec()),
            ("José Pérez.pdf".to_string(), b"%PDF-1.7 fake2".to_vec()),
        ];
        let bytes = package_zip(&documents).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Ana Ruiz.pdf", "José Pérez.pdf"]);
    }
}
