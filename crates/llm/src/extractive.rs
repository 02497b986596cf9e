//! Sentence-level extracts that need no model

use lazy_static::lazy_static;
use regex::Regex;

/// Shortest sentence considered for selection, in characters
const MIN_SENTENCE_CHARS: usize = 20;

/// Only the opening sentences of a document are scored
const MAX_CANDIDATES: usize = 100;

/// Sentences kept in an extract
const MAX_SELECTED: usize = 5;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Candidate sentences in document order
fn candidate_sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .take(MAX_CANDIDATES)
}

/// Pick the sentences mentioning the most keywords.
///
/// Each candidate scores one point per keyword it contains
/// (case-insensitive substring). Zero-score sentences are never selected; ties
/// keep document order. Returns an empty string when nothing qualifies.
pub fn select_sentences(text: &str, keywords: &[String]) -> String {
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if needles.is_empty() {
        return String::new();
    }

    let mut scored: Vec<(usize, &str)> = candidate_sentences(text)
        .map(|sentence| {
            let lowered = sentence.to_lowercase();
            let score = needles.iter().filter(|k| lowered.contains(k.as_str())).count();
            (score, sentence)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let selected: Vec<&str> = scored
        .into_iter()
        .take(MAX_SELECTED)
        .map(|(_, sentence)| sentence)
        .collect();

    if selected.is_empty() {
        String::new()
    } else {
        format!("{}.", selected.join(". "))
    }
}

/// The first `n` sentences (split on `". "`), used when no model output is
/// available. Empty for blank text.
pub fn leading_sentences(text: &str, n: usize) -> String {
    let sentences: Vec<&str> = text
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(n.max(1))
        .collect();

    if sentences.is_empty() {
        return String::new();
    }

    let joined = sentences.join(". ");
    if joined.ends_with(['.', '!', '?']) {
        joined
    } else {
        format!("{}.", joined)
    }
}
