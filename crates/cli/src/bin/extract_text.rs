//! Extract slide text from a `.pptx` file as JSON.

use anyhow::Result;
use clap::Parser;
use deck_cli::{fail, finish, init_logging};
use deck_core::{Report, TextNormalizer};
use deck_pptx::{extract_file, PptxParser};
use std::path::PathBuf;
use std::process::ExitCode;

/// Print the text of every slide, in presentation order.
#[derive(Parser, Debug)]
#[command(name = "ppt-extract-text")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: Option<PathBuf>,

    /// Collapse runs of spaces and tabs inside each text run
    #[arg(long)]
    collapse_whitespace: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(input) = args.input else {
        return fail("Missing PPTX path argument");
    };

    let parser = PptxParser::new().with_normalizer(
        TextNormalizer::new().with_collapse_whitespace(args.collapse_whitespace),
    );

    match extract_file(&input, &parser) {
        Ok(presentation) => {
            log::debug!(
                "Found {} slides in {}",
                presentation.slides.len(),
                presentation.filename
            );
            finish(&Report::texts(presentation.slide_texts()))
        }
        Err(err) => fail(err.to_string()),
    }
}
