//! Slide image extraction.
//!
//! Converts a presentation to PDF with a headless LibreOffice, rasterizes
//! every PDF page to PNG with poppler's `pdftoppm`, and returns the pages as
//! base64 payloads. Both tools run with a bounded timeout inside a scoped
//! temporary directory.

pub mod error;
pub mod extract;
pub mod office;
pub mod raster;

pub use error::ImageError;
pub use extract::{ImageConfig, ImageExtractor};
