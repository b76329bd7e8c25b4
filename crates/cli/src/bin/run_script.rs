//! Run a python-pptx generation script read from stdin.
//!
//! ```text
//! echo "$SCRIPT" | ppt-run-script out.pptx
//! {"success":true}
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use deck_cli::{fail, finish, init_logging};
use deck_core::ResultRecord;
use deck_sandbox::{InvocationRequest, SandboxConfig, ScriptRunner};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Execute a python-pptx script in a scoped sandbox process.
///
/// The script must save to `os.environ['PPTX_OUTPUT_PATH']`.
#[derive(Parser, Debug)]
#[command(name = "ppt-run-script")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where the script must save the presentation
    output: Option<PathBuf>,

    /// Python interpreter (default: $PPTX_SANDBOX_PYTHON or python3)
    #[arg(long)]
    python: Option<PathBuf>,

    /// Kill the script after this many seconds, 0 for no limit
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

    let config = SandboxConfig::from_env().with_overrides(args.python, args.timeout_secs);
    log::debug!("Sandbox config: {:?}", config);
    let runner = ScriptRunner::new(config);

    let outcome = InvocationRequest::read_from(args.output.as_deref(), io::stdin().lock())
        .and_then(|request| runner.run(&request));

    match outcome {
        Ok(report) => {
            log::debug!("Saved {}", report.output_path.display());
            finish(&ResultRecord::ok())
        }
        Err(err) if err.is_classified() => fail(err.to_string()),
        Err(err) => Err(err).context("Sandbox failed"),
    }
}
