//! Domain types for representing extracted presentation content.

use serde::{Deserialize, Serialize};

/// Represents an entire presentation with its extracted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<ExtractedSlide>,
}

impl Presentation {
    /// Create a new, empty presentation.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }

    /// Flatten every slide into its reported `{index, text}` form.
    pub fn slide_texts(&self) -> Vec<SlideText> {
        self.slides.iter().map(ExtractedSlide::to_slide_text).collect()
    }
}

/// A single extracted slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 0-based position in presentation order.
    pub index: usize,

    /// Non-empty text runs, in document order.
    pub runs: Vec<String>,
}

impl ExtractedSlide {
    /// Create a new slide at the given index.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            runs: Vec::new(),
        }
    }

    /// Add a text run. Runs that are blank after trimming are ignored.
    pub fn add_run(&mut self, text: impl Into<String>) {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if trimmed.len() == text.len() {
            self.runs.push(text);
        } else {
            self.runs.push(trimmed.to_string());
        }
    }

    /// All runs joined by single spaces.
    pub fn text(&self) -> String {
        self.runs.join(" ")
    }

    /// Convert into the reported form.
    pub fn to_slide_text(&self) -> SlideText {
        SlideText {
            index: self.index,
            text: self.text(),
        }
    }
}

/// Text of one slide as reported by the text extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideText {
    pub index: usize,
    pub text: String,
}

/// Rendered image of one slide as reported by the image extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    pub index: usize,

    /// PNG bytes, standard base64 alphabet with padding.
    pub image_base64: String,
}
