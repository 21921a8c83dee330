//! Name-list import
//!
//! Upstream text extraction (OCR of a sign-up sheet, a pasted list) hands us
//! raw text. Each non-blank line, trimmed, is one participant name.

/// Split extracted text into participant names, keeping their order
pub fn extract_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
