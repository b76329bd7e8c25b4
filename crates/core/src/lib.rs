//! Core domain types, result records, and text normalization
//! shared by the deck tools.

pub mod error;
pub mod normalize;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use report::{GeneratedPath, NoPayload, Report, ResultRecord, Slides};
pub use types::{ExtractedSlide, Presentation, SlideImage, SlideText};
