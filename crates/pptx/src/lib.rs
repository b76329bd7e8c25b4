//! PPTX (Office Open XML) slide text extraction.
//!
//! Reads .pptx files, which are ZIP archives containing XML parts, and
//! reports the text runs of every slide in presentation order.

pub mod parser;

pub use parser::{extract_file, PptxParser};
