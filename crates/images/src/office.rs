//! Headless LibreOffice conversion to PDF.

use deck_sandbox::process::wait_with_timeout;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::ImageError;

/// Executable names tried on `PATH`, in order.
const OFFICE_COMMANDS: &[&str] = &["soffice", "libreoffice", "LibreOffice"];

/// Install locations checked when nothing is on `PATH`.
fn platform_install_paths() -> Vec<PathBuf> {
    if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/Applications/LibreOffice.app/Contents/MacOS/soffice"),
            PathBuf::from("/Applications/LibreOffice.app/Contents/MacOS/soffice.com"),
        ]
    } else if cfg!(target_os = "windows") {
        let base = std::env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".into());
        let program = Path::new(&base).join("LibreOffice").join("program");
        vec![program.join("soffice.exe"), program.join("soffice.com")]
    } else {
        Vec::new()
    }
}

/// Find a LibreOffice executable.
pub fn find_office() -> Option<PathBuf> {
    OFFICE_COMMANDS
        .iter()
        .find_map(|name| which::which(name).ok())
        .or_else(|| platform_install_paths().into_iter().find(|p| p.is_file()))
}

/// Convert `input` to PDF inside `out_dir` and return the PDF path.
pub fn convert_to_pdf(
    office: &Path,
    input: &Path,
    out_dir: &Path,
    timeout: Duration,
) -> Result<PathBuf, ImageError> {
    let mut child = Command::new(office)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(out_dir)
        .arg(input)
        .current_dir(out_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ImageError::Spawn {
            tool: office.display().to_string(),
            source,
        })?;

    let output = wait_with_timeout(&mut child, None, Some(timeout), false)?;
    if output.timed_out() {
        return Err(ImageError::TimedOut);
    }
    if !output.success() {
        let detail = if !output.stderr.trim().is_empty() {
            output.stderr.trim().to_string()
        } else if !output.stdout.trim().is_empty() {
            output.stdout.trim().to_string()
        } else {
            format!("LibreOffice {}", output.outcome)
        };
        return Err(ImageError::ConversionFailed(detail));
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    find_pdf(out_dir, &stem)
}

/// `<stem>.pdf` if present, otherwise the first PDF in the directory.
pub fn find_pdf(dir: &Path, stem: &str) -> Result<PathBuf, ImageError> {
    let expected = dir.join(format!("{}.pdf", stem));
    if expected.is_file() {
        return Ok(expected);
    }

    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdfs.sort();

    match pdfs.into_iter().next() {
        Some(pdf) => {
            log::debug!("Using {} instead of {}", pdf.display(), expected.display());
            Ok(pdf)
        }
        None => Err(ImageError::NoPdfProduced),
    }
}
