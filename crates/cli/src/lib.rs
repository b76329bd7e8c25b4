//! Shared plumbing for the `ppt-*` command-line tools.
//!
//! Every tool writes exactly one JSON record to stdout and exits 0 on
//! success, 1 on failure. Logs go to stderr.

use anyhow::{Context, Result};
use deck_core::Report;
use serde::Serialize;
use std::io;
use std::process::ExitCode;

/// Initialize `env_logger` on stderr. `RUST_LOG` still wins over the default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Write `report` to stdout and map its outcome to the process exit code.
pub fn finish<T: Serialize>(report: &Report<T>) -> Result<ExitCode> {
    report
        .emit(io::stdout().lock())
        .context("Failed to write result to stdout")?;

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Shorthand for a failed record with no payload.
pub fn fail(error: impl Into<String>) -> Result<ExitCode> {
    finish(&deck_core::ResultRecord::failure(error))
}
