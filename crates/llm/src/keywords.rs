//! Keyword extraction: model first, word frequency as the fallback

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::gateway::{GenerationError, ModelGateway};
use crate::prompts::PromptBuilder;

/// Shortest word counted by the frequency fallback
const MIN_WORD_LEN: usize = 3;

/// Function words excluded from frequency ranking
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "his",
    "its", "was", "our", "out", "has", "how", "who", "did", "yet", "may", "per", "via",
    "that", "this", "with", "from", "have", "been", "were", "their", "which", "they", "them",
    "then", "than", "there", "these", "those", "what", "when", "where", "will", "would",
    "could", "should", "into", "also", "such", "about", "other", "some", "more", "most",
    "only", "over", "each", "very", "your",
];

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\b[a-z]+\b").unwrap();
}

/// Where a keyword list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSource {
    Model,
    Frequency,
}

/// Keywords together with how they were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedKeywords {
    pub keywords: Vec<String>,
    pub source: KeywordSource,

    /// Model failure that forced the fallback, if any
    pub failure: Option<GenerationError>,
}

/// Ask the model for keywords; fall back to frequency ranking on failure or
/// an unusable answer.
pub async fn extract_keywords(
    gateway: &dyn ModelGateway,
    prompts: &PromptBuilder,
    text: &str,
    top_n: usize,
) -> ExtractedKeywords {
    let failure = match gateway.generate(&prompts.keywords(text, top_n)).await {
        Ok(response) => {
            let keywords = parse_keyword_list(&response, top_n);
            if !keywords.is_empty() {
                debug!("Model returned {} keywords", keywords.len());
                return ExtractedKeywords {
                    keywords,
                    source: KeywordSource::Model,
                    failure: None,
                };
            }
            debug!("Model keyword answer was unusable, ranking by frequency");
            None
        }
        Err(e) => {
            warn!("Keyword extraction failed, ranking by frequency: {}", e);
            Some(e)
        }
    };

    ExtractedKeywords {
        keywords: frequency_keywords(text, top_n),
        source: KeywordSource::Frequency,
        failure,
    }
}

/// Clean a model's comma-separated keyword answer.
///
/// Splits on commas and newlines, strips bullets, numbering and quotes,
/// drops a leading `Keywords:` label, dedupes case-insensitively and keeps at
/// most `top_n` entries in answer order.
pub fn parse_keyword_list(response: &str, top_n: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for raw in response.split([',', '\n']) {
        let mut term = raw.trim();
        if let Some((label, rest)) = term.split_once(':') {
            if label.trim().eq_ignore_ascii_case("keywords") {
                term = rest.trim();
            }
        }

        let term = term
            .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_ascii_digit())
            .trim_start_matches(['.', ')'])
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim_end_matches('.')
            .trim();

        if term.is_empty() {
            continue;
        }

        if seen.insert(term.to_lowercase()) {
            keywords.push(term.to_string());
        }

        if keywords.len() >= top_n {
            break;
        }
    }

    keywords
}

/// Frequency-ranked keywords.
///
/// Counts lowercase ASCII words of at least three letters outside the
/// stopword set; ranks by count, ties broken by first occurrence.
pub fn frequency_keywords(text: &str, top_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();

    // word -> (count, first occurrence)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.len() >= MIN_WORD_LEN && !stopwords.contains(w))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGateway;

    #[tokio::test]
    async fn test_extract_keywords_from_model() {
        let gateway = MockGateway::new("Revenue, churn, revenue");
        let extracted =
            extract_keywords(&gateway, &PromptBuilder::default(), "some text", 5).await;
        assert_eq!(extracted.source, KeywordSource::Model);
        assert_eq!(extracted.keywords, vec!["Revenue", "churn"]);
    }

    #[tokio::test]
    async fn test_extract_keywords_falls_back() {
        let gateway = MockGateway::failing(GenerationError::unavailable("down"));
        let extracted = extract_keywords(
            &gateway,
            &PromptBuilder::default(),
            "the quick quick fox fox fox jumps",
            2,
        )
        .await;
        assert_eq!(extracted.source, KeywordSource::Frequency);
        assert_eq!(extracted.keywords, vec!["fox", "quick"]);
        assert!(extracted.failure.is_some());

        let blank = MockGateway::new(",,");
        let extracted =
            extract_keywords(&blank, &PromptBuilder::default(), "fox fox quick", 2).await;
        assert_eq!(extracted.source, KeywordSource::Frequency);
        assert_eq!(extracted.failure, None);
    }

    #[test]
    fn test_frequency_order_and_ties() {
        let keywords = frequency_keywords("the quick quick fox fox fox jumps", 2);
        assert_eq!(keywords, vec!["fox", "quick"]);
    }

    #[test]
    fn test_frequency_tie_break_by_first_occurrence() {
        let keywords = frequency_keywords("delta alpha delta alpha gamma", 3);
        assert_eq!(keywords, vec!["delta", "alpha", "gamma"]);
    }

    #[test]
    fn test_frequency_filters_stopwords_and_short_words() {
        let keywords = frequency_keywords("This is it. That was an ox with their data", 10);
        assert_eq!(keywords, vec!["data"]);
    }

    #[test]
    fn test_frequency_is_case_insensitive() {
        let keywords = frequency_keywords("Revenue revenue REVENUE growth", 1);
        assert_eq!(keywords, vec!["revenue"]);
    }

    #[test]
    fn test_frequency_empty_text() {
        assert!(frequency_keywords("", 5).is_empty());
    }

    #[test]
    fn test_parse_keyword_list() {
        let keywords = parse_keyword_list("Keywords: revenue, \"market share\", Revenue, - churn.", 10);
        assert_eq!(keywords, vec!["revenue", "market share", "churn"]);
    }

    #[test]
    fn test_parse_keyword_list_lines_and_limit() {
        let keywords = parse_keyword_list("1. alpha\n2. beta\n3. gamma", 2);
        assert_eq!(keywords, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_parse_keyword_list_blank() {
        assert!(parse_keyword_list(" , ,\n", 5).is_empty());
    }
}
