//! Single-line JSON result records written by every tool.
//!
//! Each invocation writes exactly one record to stdout:
//!
//! ```text
//! {"success":true}
//! {"success":true,"slides":[{"index":0,"text":"Hello"}]}
//! {"success":false,"error":"Empty script received"}
//! ```

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{SlideImage, SlideText};

/// A success/error record, optionally carrying a payload flattened next to
/// the `success` flag.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    pub success: bool,

    #[serde(flatten)]
    pub payload: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload type for records that carry nothing besides the outcome.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoPayload {}

/// The sandbox result record: `{success, error?}`.
pub type ResultRecord = Report<NoPayload>;

/// Payload of the extractor records.
#[derive(Debug, Clone, Serialize)]
pub struct Slides<T> {
    pub slides: Vec<T>,
}

/// Payload of the generator record.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPath {
    pub path: String,
}

impl<T: Serialize> Report<T> {
    /// A successful record with the given payload.
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// A failed record carrying only a message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Serialize to one line of JSON (no trailing newline).
    ///
    /// `serde_json` escapes control characters inside strings, so the
    /// result never spans more than one line.
    pub fn to_line(&self) -> io::Result<String> {
        serde_json::to_string(self).map_err(io::Error::other)
    }

    /// Write the record and its newline with a single write, then flush.
    pub fn emit<W: Write>(&self, mut out: W) -> io::Result<()> {
        let mut line = self.to_line()?;
        line.push('\n');
        out.write_all(line.as_bytes())?;
        out.flush()
    }
}

impl ResultRecord {
    /// `{"success":true}`
    pub fn ok() -> Self {
        Self::success(NoPayload {})
    }
}

impl Report<Slides<SlideText>> {
    pub fn texts(slides: Vec<SlideText>) -> Self {
        Self::success(Slides { slides })
    }
}

impl Report<Slides<SlideImage>> {
    pub fn images(slides: Vec<SlideImage>) -> Self {
        Self::success(Slides { slides })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_record() {
        assert_eq!(ResultRecord::ok().to_line().unwrap(), r#"{"success":true}"#);
    }

    #[test]
    fn test_failure_record_stays_on_one_line() {
        let record = ResultRecord::failure("ValueError: boom\nTraceback:\n  line 3");
        let line = record.to_line().unwrap();

        assert!(!line.contains('\n'));
        assert_eq!(
            line,
            r#"{"success":false,"error":"ValueError: boom\nTraceback:\n  line 3"}"#
        );
    }

    #[test]
    fn test_text_payload_is_flattened() {
        let record = Report::texts(vec![SlideText {
            index: 0,
            text: "Hello".into(),
        }]);

        assert_eq!(
            record.to_line().unwrap(),
            r#"{"success":true,"slides":[{"index":0,"text":"Hello"}]}"#
        );
    }

    #[test]
    fn test_failure_omits_payload() {
        let record: Report<GeneratedPath> = Report::failure("Invalid JSON");
        assert_eq!(
            record.to_line().unwrap(),
            r#"{"success":false,"error":"Invalid JSON"}"#
        );
    }

    #[test]
    fn test_emit_writes_exactly_one_line() {
        let mut buf = Vec::new();
        Report::success(GeneratedPath {
            path: "/tmp/out.pptx".into(),
        })
        .emit(&mut buf)
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"success\":true,\"path\":\"/tmp/out.pptx\"}\n");
        assert_eq!(text.lines().count(), 1);
    }
}
