//! # Constancia CLI
//!
//! Batch certificate generator. One PDF per CSV row, rendered over a
//! background image, packaged as a ZIP.
//!
//! ## Usage
//!
//! ```bash
//! # Generate the whole batch
//! constancia generate --background fondo.png --data alumnos.csv \
//!     --styles estilos.json --signature firma1.png --signature firma2.png
//!
//! # Preview a single row without packaging
//! constancia preview --background fondo.png --data alumnos.csv \
//!     --styles estilos.json --row 0 --out preview.pdf
//! ```

use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use constancia::batch::{self, BatchConfig};
use constancia::error::{RenderError, RenderResult};
use constancia::input;
use constancia::types::{LayoutOptions, StyleSheet};

/// Constancia - certificate batch generator
#[derive(Parser, Debug)]
#[command(name = "constancia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Background image; its pixel dimensions define the page size
    #[arg(long)]
    background: PathBuf,

    /// CSV file with one row per certificate
    #[arg(long)]
    data: PathBuf,

    /// JSON style sheet mapping field names to font settings
    #[arg(long)]
    styles: PathBuf,

    /// Signature image, repeatable up to three times
    #[arg(long = "signature")]
    signatures: Vec<PathBuf>,

    /// Vertical position where the first text block starts, in pixels
    #[arg(long, default_value_t = 260.0)]
    y_start: f64,

    /// Line height as a multiple of the font size
    #[arg(long, default_value_t = 1.3)]
    line_height: f64,

    /// Signature size as a percentage of the 130px box
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    signature_scale: u32,

    /// Point size of the caption under each signature
    #[arg(long, default_value_t = 20)]
    caption_size: u32,

    /// Field whose value names each output file
    #[arg(long, default_value = "nombre")]
    name_field: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every row and package the documents into a ZIP archive
    Generate {
        #[command(flatten)]
        render: RenderArgs,

        /// Output archive path
        #[arg(long, default_value = "constancias.zip")]
        out: PathBuf,
    },
    /// Render a single row to one PDF
    Preview {
        #[command(flatten)]
        render: RenderArgs,

        /// Zero-based row index to render
        #[arg(long, default_value_t = 0)]
        row: usize,

        /// Output PDF path
        #[arg(long, default_value = "preview.pdf")]
        out: PathBuf,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> RenderResult<()> {
    match cli.command {
        Commands::Generate { render, out } => generate(render, out),
        Commands::Preview { render, row, out } => preview(render, row, out),
    }
}

fn build_config(args: &RenderArgs) -> RenderResult<BatchConfig> {
    let styles = StyleSheet::from_reader(File::open(&args.styles)?)?;
    Ok(BatchConfig {
        styles,
        signatures: args.signatures.clone(),
        name_field: args.name_field.clone(),
        layout: LayoutOptions {
            y_start: args.y_start,
            line_height_multiplier: args.line_height,
            signature_scale: args.signature_scale,
            caption_size: args.caption_size,
        },
    })
}

fn generate(args: RenderArgs, out: PathBuf) -> RenderResult<()> {
    let background = image::open(&args.background)?;
    let table = input::read_records_from_path(&args.data)?;
    let config = build_config(&args)?;

    let outcome = batch::generate(&background, &table, &config)?;
    for failure in &outcome.failures {
        eprintln!(
            "warning: no document for '{}': {}",
            failure.record_name, failure.error
        );
    }

    let archive = batch::package_zip(&outcome.documents)?;
    std::fs::write(&out, archive)?;
    println!(
        "{} of {} documents written to {}",
        outcome.documents.len(),
        table.records.len(),
        out.display()
    );
    Ok(())
}

fn preview(args: RenderArgs, row: usize, out: PathBuf) -> RenderResult<()> {
    let background = image::open(&args.background)?;
    let table = input::read_records_from_path(&args.data)?;
    let config = build_config(&args)?;

    batch::validate(&config, &table.schema, f64::from(background.width()))?;
    let record = table.records.get(row).ok_or_else(|| {
        RenderError::InvalidInput(format!(
            "row {row} is out of range, the table has {} records",
            table.records.len()
        ))
    })?;

    let document = constancia::compose_certificate(
        &background,
        record,
        &table.schema,
        &config.styles,
        &config.signatures,
        &config.layout,
    )?;
    for error in &document.image_failures {
        eprintln!("warning: {error}");
    }

    std::fs::write(&out, document.bytes)?;
    println!("preview written to {}", out.display());
    Ok(())
}
