//! Render every slide of a `.pptx` file to a base64 PNG.

use anyhow::Result;
use clap::Parser;
use deck_cli::{fail, finish, init_logging};
use deck_core::Report;
use deck_images::{ImageConfig, ImageError, ImageExtractor};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert slides to images through LibreOffice and pdftoppm.
#[derive(Parser, Debug)]
#[command(name = "ppt-extract-images")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: Option<PathBuf>,

    /// LibreOffice executable (default: search PATH and install locations)
    #[arg(long)]
    soffice: Option<PathBuf>,

    /// pdftoppm executable (default: search PATH)
    #[arg(long)]
    pdftoppm: Option<PathBuf>,

    /// Rasterization resolution
    #[arg(long, default_value = "150")]
    dpi: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(input) = args.input else {
        return fail(ImageError::MissingArgument.to_string());
    };

    let extractor = ImageExtractor::new(ImageConfig {
        office: args.soffice,
        rasterizer: args.pdftoppm,
        dpi: args.dpi,
        ..ImageConfig::default()
    });

    match extractor.extract(&input) {
        Ok(slides) => finish(&Report::images(slides)),
        Err(err) => fail(err.to_string()),
    }
}
