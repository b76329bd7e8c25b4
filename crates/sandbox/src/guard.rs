//! Fast rejection of scripts written for the JavaScript tool chain.
//!
//! Generated scripts sometimes come back as PptxGenJS programs. Running
//! them through Python only yields an opaque `SyntaxError`, so the leading
//! text is checked against a fixed marker table first. This is a hint for
//! authors, not a security check.

/// Leading tokens of JavaScript programs.
pub const FOREIGN_MARKERS: &[&str] = &[
    "const ",
    "var ",
    "let ",
    "function ",
    "require(",
    "//",
    "/*",
    "=>",
    "module.exports",
    "export ",
];

/// Return the marker the script starts with, ignoring leading whitespace.
pub fn detect_foreign_language(source: &str) -> Option<&'static str> {
    let lead = source.trim_start();
    FOREIGN_MARKERS
        .iter()
        .copied()
        .find(|marker| lead.starts_with(marker))
}
