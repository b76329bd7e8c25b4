//! Error types for slide image extraction.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Missing PPTX path argument")]
    MissingArgument,

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(
        "LibreOffice not found. Install LibreOffice to view presentations as images: \
         https://www.libreoffice.org"
    )]
    OfficeNotFound,

    #[error(
        "pdftoppm not found. Install poppler: brew install poppler (macOS) \
         or apt install poppler-utils (Linux)"
    )]
    RasterizerNotFound,

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to convert PPTX to PDF: {0}")]
    ConversionFailed(String),

    #[error("LibreOffice did not produce a PDF file")]
    NoPdfProduced,

    #[error("Failed to convert PDF to images: {0}")]
    RasterFailed(String),

    #[error("Image extraction took too long. Please try again.")]
    TimedOut,

    #[error("{0}")]
    Io(#[from] io::Error),
}
