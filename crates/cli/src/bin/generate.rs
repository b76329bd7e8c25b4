//! Build a presentation from a JSON deck description on stdin.
//!
//! ```text
//! echo '{"theme":"forest_moss","slides":[{"title":"Hi"}]}' | ppt-generate out.pptx
//! {"success":true,"path":"/abs/out.pptx"}
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use deck_cli::{fail, finish, init_logging};
use deck_core::{GeneratedPath, Report};
use deck_generate::{DeckGenerator, DeckSpec, GenerateError};
use deck_sandbox::{SandboxConfig, SandboxError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a themed presentation from a declarative description.
#[derive(Parser, Debug)]
#[command(name = "ppt-generate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to write the presentation
    output: Option<PathBuf>,

    /// Python interpreter with python-pptx (default: $PPTX_SANDBOX_PYTHON or python3)
    #[arg(long)]
    python: Option<PathBuf>,

    /// Kill generation after this many seconds, 0 for no limit
    /// (default: $PPTX_SANDBOX_TIMEOUT_SECS or 120)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(output) = args.output else {
        return fail(SandboxError::MissingArgument.to_string());
    };

    let deck = match DeckSpec::from_reader(io::stdin().lock()) {
        Ok(deck) => deck,
        Err(err) => return fail(err.to_string()),
    };

    let config = SandboxConfig::from_env().with_overrides(args.python, args.timeout_secs);
    let generator = DeckGenerator::new(config);

    match generator.generate(&deck, &output) {
        Ok(path) => finish(&Report::success(GeneratedPath {
            path: path.display().to_string(),
        })),
        Err(GenerateError::Sandbox(err)) if !err.is_classified() => {
            Err(err).context("Sandbox failed")
        }
        Err(err) => fail(err.to_string()),
    }
}
