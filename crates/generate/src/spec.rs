//! The JSON deck description.
//!
//! ```json
//! {
//!   "title": "Presentation Title",
//!   "theme": "ocean_gradient",
//!   "slides": [
//!     { "layout": "title", "title": "Slide Title", "subtitle": "Subtitle" },
//!     { "layout": "content", "title": "Section", "bullets": ["Point 1", "Point 2"] },
//!     { "layout": "blank", "textboxes": [{ "text": "...", "left": 1, "top": 1, "width": 8, "height": 1 }] },
//!     { "layout": "title_only", "title": "Slide Title" }
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::io::Read;

use crate::error::GenerateError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckSpec {
    /// Used for the placeholder slide of an empty deck.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default)]
    pub slides: Vec<SlideSpec>,
}

impl DeckSpec {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GenerateError> {
        serde_json::from_reader(reader).map_err(GenerateError::InvalidJson)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideSpec {
    /// Layout name; `content` when absent.
    #[serde(default)]
    pub layout: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub bullets: Vec<String>,

    #[serde(default)]
    pub textboxes: Vec<TextBoxSpec>,
}

impl SlideSpec {
    pub fn layout(&self) -> SlideLayout {
        SlideLayout::from_name(self.layout.as_deref().unwrap_or("content"))
    }
}

/// A free text box on a blank slide. Geometry is in inches.
#[derive(Debug, Clone, Deserialize)]
pub struct TextBoxSpec {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_left")]
    pub left: f64,
    #[serde(default = "default_top")]
    pub top: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_left() -> f64 {
    1.0
}

fn default_top() -> f64 {
    1.0
}

fn default_width() -> f64 {
    8.0
}

fn default_height() -> f64 {
    1.0
}

/// Slide layouts of the default python-pptx template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Title and subtitle.
    Title,
    /// Title and bulleted body (`content` or `bullet`).
    Content,
    TitleOnly,
    Blank,
    /// Unrecognized name: content layout, left empty.
    Unknown,
}

impl SlideLayout {
    pub fn from_name(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "content" | "bullet" => Self::Content,
            "title_only" => Self::TitleOnly,
            "blank" => Self::Blank,
            _ => Self::Unknown,
        }
    }

    /// Index into `prs.slide_layouts`.
    pub fn index(&self) -> usize {
        match self {
            Self::Title => 0,
            Self::Content | Self::Unknown => 1,
            Self::TitleOnly => 5,
            Self::Blank => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_names() {
        assert_eq!(SlideLayout::from_name("title").index(), 0);
        assert_eq!(SlideLayout::from_name("content").index(), 1);
        assert_eq!(SlideLayout::from_name("bullet"), SlideLayout::Content);
        assert_eq!(SlideLayout::from_name("title_only").index(), 5);
        assert_eq!(SlideLayout::from_name("blank").index(), 6);
        assert_eq!(SlideLayout::from_name("hero"), SlideLayout::Unknown);
        assert_eq!(SlideLayout::Unknown.index(), 1);
    }

    #[test]
    fn test_parse_full_spec() {
        let json = r#"{
            "title": "Roadmap",
            "theme": "forest_moss",
            "slides": [
                { "layout": "title", "title": "Roadmap", "subtitle": "2025" },
                { "title": "Goals", "bullets": ["Ship", "Learn"] },
                { "layout": "blank", "textboxes": [{ "text": "Note", "left": 2.5 }] }
            ]
        }"#;
        let deck = DeckSpec::from_reader(json.as_bytes()).unwrap();

        assert_eq!(deck.theme.as_deref(), Some("forest_moss"));
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.slides[1].layout(), SlideLayout::Content);
        assert_eq!(deck.slides[1].bullets, vec!["Ship", "Learn"]);

        let textbox = &deck.slides[2].textboxes[0];
        assert_eq!(textbox.left, 2.5);
        assert_eq!(textbox.top, 1.0);
        assert_eq!(textbox.width, 8.0);
        assert_eq!(textbox.height, 1.0);
    }

    #[test]
    fn test_empty_object_is_an_empty_deck() {
        let deck = DeckSpec::from_reader("{}".as_bytes()).unwrap();
        assert!(deck.slides.is_empty());
        assert!(deck.title.is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = DeckSpec::from_reader("{\"slides\": [".as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON: "));
    }
}
