//! Model-independent detection of conventional document sections

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::chunking::truncate_chars;

/// Longest span kept per detected section, in characters
pub const MAX_SECTION_CHARS: usize = 1000;

/// Conventional section of a report or paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSection {
    Abstract,
    Introduction,
    Methodology,
    Results,
    Conclusion,
}

impl DocumentSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Introduction => "introduction",
            Self::Methodology => "methodology",
            Self::Results => "results",
            Self::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for DocumentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header pattern and the patterns that end the section body
struct SectionPattern {
    section: DocumentSection,
    header: Regex,
    terminator: Regex,
}

impl SectionPattern {
    fn new(section: DocumentSection, header: &str, terminator: &str) -> Self {
        Self {
            section,
            header: Regex::new(header).unwrap(),
            terminator: Regex::new(terminator).unwrap(),
        }
    }

    /// Body between the first header and the earliest terminator after it
    fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        let header = self.header.find(text)?;
        let rest = &text[header.end()..];
        let body = match self.terminator.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        };
        Some(body.trim())
    }
}

lazy_static! {
    // Headers and section-name terminators match case-insensitively. The
    // line-break terminators are case-sensitive on the next letter: a new
    // paragraph only ends a section when it opens with a capital, so a
    // lowercase continuation stays in the section.
    static ref SECTION_PATTERNS: Vec<SectionPattern> = vec![
        SectionPattern::new(
            DocumentSection::Abstract,
            r"(?i)abstract[:\s]+",
            r"(?i)\n\s*\n|\n(?-i:[A-Z])|introduction",
        ),
        SectionPattern::new(
            DocumentSection::Introduction,
            r"(?i)introduction[:\s]+",
            r"(?i)\n\s*\n(?-i:[A-Z])|methodology|methods",
        ),
        SectionPattern::new(
            DocumentSection::Methodology,
            r"(?i)(?:methodology|methods)[:\s]+",
            r"(?i)\n\s*\n(?-i:[A-Z])|results",
        ),
        SectionPattern::new(
            DocumentSection::Results,
            r"(?i)results[:\s]+",
            r"(?i)\n\s*\n(?-i:[A-Z])|discussion|conclusion",
        ),
        SectionPattern::new(
            DocumentSection::Conclusion,
            r"(?i)conclusion[:\s]+",
            r"(?i)\n\s*\n(?-i:[A-Z])|references",
        ),
    ];
}

/// Detect conventional sections in raw text.
///
/// Each section is searched independently; sections whose header never
/// appears are absent from the map. Spans are trimmed and capped at
/// [`MAX_SECTION_CHARS`] characters.
pub fn detect_sections(text: &str) -> BTreeMap<DocumentSection, String> {
    SECTION_PATTERNS
        .iter()
        .filter_map(|pattern| {
            pattern.find(text).map(|body| {
                (
                    pattern.section,
                    truncate_chars(body, MAX_SECTION_CHARS).to_string(),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "Abstract: We study caching in edge networks.\n\n\
Introduction: Edge caching reduces latency for mobile users.\n\n\
Methods: We simulate 40 base stations over a week.\n\n\
Results: Hit rates improved by 23 percent.\n\n\
Conclusion: Cooperative caching pays off.\n\n\
References\n[1] Someone, 2020.";

    #[test]
    fn test_detects_all_sections() {
        let sections = detect_sections(PAPER);
        assert_eq!(sections.len(), 5);
        assert_eq!(
            sections[&DocumentSection::Abstract],
            "We study caching in edge networks."
        );
        assert_eq!(
            sections[&DocumentSection::Methodology],
            "We simulate 40 base stations over a week."
        );
        assert_eq!(
            sections[&DocumentSection::Results],
            "Hit rates improved by 23 percent."
        );
        assert_eq!(
            sections[&DocumentSection::Conclusion],
            "Cooperative caching pays off."
        );
    }

    #[test]
    fn test_missing_sections_are_absent() {
        let sections = detect_sections("Just a memo about lunch.");
        assert!(sections.is_empty());

        let sections = detect_sections("Conclusion: ship it.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[&DocumentSection::Conclusion], "ship it.");
    }

    #[test]
    fn test_body_stops_at_next_section_name() {
        let sections = detect_sections("RESULTS: accuracy rose; see conclusion below");
        assert_eq!(sections[&DocumentSection::Results], "accuracy rose; see");
    }

    #[test]
    fn test_lowercase_paragraph_continues_section() {
        let text = "Introduction: first part.\n\ncontinued here.\n\nNext Topic";
        let sections = detect_sections(text);
        assert_eq!(
            sections[&DocumentSection::Introduction],
            "first part.\n\ncontinued here."
        );
    }

    #[test]
    fn test_span_is_capped() {
        let text = format!("Conclusion: {}", "a".repeat(1500));
        let sections = detect_sections(&text);
        assert_eq!(
            sections[&DocumentSection::Conclusion].chars().count(),
            MAX_SECTION_CHARS
        );
    }

    #[test]
    fn test_serializes_lowercase_keys() {
        let sections = detect_sections("Abstract: short.");
        let json = serde_json::to_value(&sections).unwrap();
        assert_eq!(json["abstract"], "short.");
    }
}
