//! Text normalization for extracted slide runs.
//!
//! Composes decomposed Unicode sequences, unifies line endings, and
//! optionally collapses runs of blanks.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

/// Control characters PowerPoint uses inside runs for soft breaks.
const SOFT_BREAK_CHARS: &[char] = &['\u{000B}', '\u{2028}'];

/// Text normalizer for slide runs.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    /// Whether to collapse runs of spaces and tabs into one space.
    collapse_whitespace: bool,
}

impl TextNormalizer {
    /// Create a normalizer that keeps interior whitespace as written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to collapse runs of blanks inside a run.
    pub fn with_collapse_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }

    /// Normalize a single text run.
    ///
    /// - NFC-composes the text
    /// - Maps `\r\n`, `\r` and soft breaks to `\n`
    /// - Optionally collapses blank runs to single spaces
    /// - Trims leading/trailing whitespace
    ///
    /// Returns `None` when nothing but whitespace remains.
    pub fn normalize_run(&self, text: &str) -> Option<String> {
        let mut result: String = text.nfc().collect();

        result = result.replace("\r\n", "\n").replace('\r', "\n");
        if result.contains(SOFT_BREAK_CHARS) {
            result = result.replace(SOFT_BREAK_CHARS, "\n");
        }

        if self.collapse_whitespace {
            result = WHITESPACE_COLLAPSE_REGEX
                .replace_all(&result, " ")
                .into_owned();
        }

        let trimmed = result.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_drops_blank_runs() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize_run("  Hello  "), Some("Hello".to_string()));
        assert_eq!(normalizer.normalize_run("   "), None);
        assert_eq!(normalizer.normalize_run("\t\n"), None);
    }

    #[test]
    fn test_keeps_interior_whitespace_by_default() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.normalize_run("Hello    world"),
            Some("Hello    world".to_string())
        );
    }

    #[test]
    fn test_collapse_whitespace() {
        let normalizer = TextNormalizer::new().with_collapse_whitespace(true);

        assert_eq!(
            normalizer.normalize_run("Hello \t  world"),
            Some("Hello world".to_string())
        );
        assert_eq!(
            normalizer.normalize_run("non\u{00A0}\u{00A0}breaking"),
            Some("non breaking".to_string())
        );
    }

    #[test]
    fn test_line_endings_and_soft_breaks() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.normalize_run("one\r\ntwo\rthree\u{000B}four"),
            Some("one\ntwo\nthree\nfour".to_string())
        );
    }

    #[test]
    fn test_nfc_composition() {
        let normalizer = TextNormalizer::new();

        // "e" + combining acute accent composes to a single code point
        let decomposed = "Caf\u{0065}\u{0301}";
        assert_eq!(normalizer.normalize_run(decomposed), Some("Café".to_string()));
    }
}
