//! End-to-end batch generation: CSV in, ZIP of per-record PDFs out

use std::io::{Cursor, Read};
use std::path::PathBuf;

use image::DynamicImage;

use constancia::batch::{self, BatchConfig};
use constancia::input;
use constancia::render;
use constancia::types::LayoutOptions;
use constancia::StyleSheet;

const CSV: &str = "nombre,fecha\nAna Ruiz,01/01/2024\nJosé Pérez,02/01/2024\n";

const STYLES: &str = r##"{
    "nombre": { "size": 35, "family": "Arial", "color": "#000000" },
    "fecha":  { "size": 35, "family": "Arial", "color": [0, 0, 0] }
}"##;

fn config(signatures: Vec<PathBuf>) -> BatchConfig {
    BatchConfig {
        styles: StyleSheet::from_json(STYLES).unwrap(),
        signatures,
        name_field: "nombre".to_string(),
        layout: LayoutOptions {
            y_start: 460.0,
            line_height_multiplier: 1.3,
            signature_scale: 100,
            caption_size: 20,
        },
    }
}

#[test]
fn batch_produces_a_zip_of_named_pdfs() {
    let background = DynamicImage::new_rgb8(1650, 1275);
    let table = input::read_records(CSV.as_bytes()).unwrap();
    let outcome = batch::generate(&background, &table, &config(Vec::new())).unwrap();

    assert_eq!(outcome.documents.len(), 2);
    assert!(outcome.failures.is_empty());
    assert!(outcome.image_failures.is_empty());

    let archive_bytes = batch::package_zip(&outcome.documents).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["Ana Ruiz.pdf", "José Pérez.pdf"]);

    let mut first = Vec::new();
    archive
        .by_name("Ana Ruiz.pdf")
        .unwrap()
        .read_to_end(&mut first)
        .unwrap();
    assert!(first.starts_with(b"%PDF-"));
}

#[test]
fn signatures_flow_through_with_missing_files_reported() {
    let dir = std::env::temp_dir().join("constancia-e2e");
    std::fs::create_dir_all(&dir).unwrap();
    let firma = dir.join("Dra Gómez.png");
    DynamicImage::new_rgba8(16, 16).save(&firma).unwrap();
    let missing = dir.join("ausente.png");
    let _ = std::fs::remove_file(&missing);

    let background = DynamicImage::new_rgb8(1650, 1275);
    let table = input::read_records(CSV.as_bytes()).unwrap();
    let outcome = batch::generate(&background, &table, &config(vec![firma, missing])).unwrap();

    // documents still come out; every record reports the one bad image
    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.image_failures.len(), 2);
}

#[test]
fn layout_matches_the_reference_geometry() {
    // background 1650x1275, 35pt fields, y_start 460, multiplier 1.3
    let (column_x, column_width) = render::text_column(1650.0);
    assert!((column_width - 1237.5).abs() < 1e-9);
    assert!((column_x - 206.25).abs() < 1e-9);

    let mut canvas = constancia::canvas::Canvas::new(1650.0, 1275.0);
    let table = input::read_records(CSV.as_bytes()).unwrap();
    let styles = StyleSheet::from_json(STYLES).unwrap();
    let y_end = render::render_fields(
        &mut canvas,
        &table.records[0],
        &table.schema,
        &styles,
        460.0,
        1.3,
    )
    .unwrap();

    // both fields fit one line: 460 + 2 * (35 * 1.3)
    assert!((y_end - 551.0).abs() < 1e-9);
}
