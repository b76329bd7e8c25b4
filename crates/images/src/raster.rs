//! PDF page rasterization with poppler's `pdftoppm`.

use deck_sandbox::process::wait_with_timeout;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::ImageError;

/// File name prefix of rendered pages: `slide-1.png`, `slide-01.png`, ...
pub const PAGE_PREFIX: &str = "slide";

pub fn find_rasterizer() -> Option<PathBuf> {
    which::which("pdftoppm").ok()
}

/// Render every page of `pdf` into `out_dir` and return the PNGs in page
/// order.
pub fn rasterize(
    rasterizer: &Path,
    pdf: &Path,
    out_dir: &Path,
    dpi: u32,
    timeout: Duration,
) -> Result<Vec<PathBuf>, ImageError> {
    let mut child = Command::new(rasterizer)
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-png")
        .arg(pdf)
        .arg(out_dir.join(PAGE_PREFIX))
        .current_dir(out_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ImageError::Spawn {
            tool: rasterizer.display().to_string(),
            source,
        })?;

    let output = wait_with_timeout(&mut child, None, Some(timeout), false)?;
    if output.timed_out() {
        return Err(ImageError::TimedOut);
    }
    if !output.success() {
        let detail = output.stderr.trim();
        return Err(ImageError::RasterFailed(if detail.is_empty() {
            format!("pdftoppm {}", output.outcome)
        } else {
            detail.to_string()
        }));
    }

    collect_pages(out_dir)
}

/// Rendered pages in `dir`, ordered by page number.
///
/// `pdftoppm` zero-pads the page number to the width of the page count, so
/// names are compared numerically rather than lexically.
pub fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>, ImageError> {
    let mut pages: Vec<(usize, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();

    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// `slide-12.png` -> `Some(12)`
fn page_number(path: &Path) -> Option<usize> {
    if !path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
    {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let number = stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    number.parse().ok()
}
