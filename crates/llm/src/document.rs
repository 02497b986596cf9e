//! Merging of several extracted documents into one summarizable text

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::SourceDocument;

lazy_static! {
    static ref EXTRA_BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Strip trailing spaces from lines and collapse runs of blank lines
pub fn normalize_whitespace(text: &str) -> String {
    let stripped = text
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    EXTRA_BLANK_LINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}

/// Combine documents for a single summarization pass.
///
/// A single document is returned normalized and without a header; several
/// documents are each introduced by a `=== Document: name ===` line. Blank
/// documents are skipped.
pub fn combine_documents(documents: &[SourceDocument]) -> String {
    let non_blank: Vec<(&str, String)> = documents
        .iter()
        .map(|doc| (doc.name.as_str(), normalize_whitespace(&doc.text)))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    match non_blank.as_slice() {
        [] => String::new(),
        [(_, text)] => text.clone(),
        many => many
            .iter()
            .map(|(name, text)| format!("=== Document: {} ===\n\n{}", name, text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
