//! Parsing of bracket-delimited model output into named sections

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Section of a structured summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SummarySection {
    #[serde(rename = "overview")]
    Overview,
    #[serde(rename = "key insights")]
    KeyInsights,
    #[serde(rename = "risks")]
    Risks,
    #[serde(rename = "recommendations")]
    Recommendations,
}

impl SummarySection {
    pub const ALL: [SummarySection; 4] = [
        SummarySection::Overview,
        SummarySection::KeyInsights,
        SummarySection::Risks,
        SummarySection::Recommendations,
    ];

    /// Map key of this section
    pub fn key(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::KeyInsights => "key insights",
            Self::Risks => "risks",
            Self::Recommendations => "recommendations",
        }
    }

    /// Upper-case header text as emitted by the model
    pub fn header(&self) -> &'static str {
        match self {
            Self::Overview => "OVERVIEW",
            Self::KeyInsights => "KEY INSIGHTS",
            Self::Risks => "RISKS",
            Self::Recommendations => "RECOMMENDATIONS",
        }
    }
}

impl fmt::Display for SummarySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsed sections; a missing key means the marker was never seen
pub type SectionMap = BTreeMap<SummarySection, String>;

/// Longest header text (before any `:`) still considered a bare header
const MAX_BARE_HEADER_CHARS: usize = 48;

/// How a line is recognized as a section boundary
#[derive(Debug, Clone, Copy)]
enum MarkerRule {
    /// Line contains this bracketed prefix anywhere, e.g. `[RISKS` in `[RISKS & CHALLENGES]`
    Bracketed(&'static str),
    /// Short line whose undecorated text starts with this header
    BareHeader(&'static str),
}

/// Consulted top to bottom; the first matching row wins
const MARKER_TABLE: &[(SummarySection, MarkerRule)] = &[
    (SummarySection::Overview, MarkerRule::Bracketed("[OVERVIEW")),
    (SummarySection::KeyInsights, MarkerRule::Bracketed("[KEY INSIGHTS")),
    (SummarySection::Risks, MarkerRule::Bracketed("[RISKS")),
    (SummarySection::Recommendations, MarkerRule::Bracketed("[RECOMMENDATIONS")),
    (SummarySection::Overview, MarkerRule::BareHeader("OVERVIEW")),
    (SummarySection::KeyInsights, MarkerRule::BareHeader("KEY INSIGHTS")),
    (SummarySection::Risks, MarkerRule::BareHeader("RISKS")),
    (SummarySection::Recommendations, MarkerRule::BareHeader("RECOMMENDATIONS")),
];

impl MarkerRule {
    fn matches(&self, line: &str, upper: &str) -> bool {
        match self {
            MarkerRule::Bracketed(prefix) => upper.contains(prefix),
            MarkerRule::BareHeader(header) => {
                if header_part(line).chars().count() > MAX_BARE_HEADER_CHARS {
                    return false;
                }
                let undecorated = strip_decoration(header_part(upper));
                match undecorated.strip_prefix(header) {
                    Some(rest) => is_header_tail(rest),
                    None => false,
                }
            }
        }
    }

    /// Text following the marker on its own line, e.g. `[OVERVIEW] Text`
    /// or `**Overview:** Text`
    fn inline_content<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = match self {
            MarkerRule::Bracketed(_) => line.split_once(']')?.1,
            MarkerRule::BareHeader(_) => line.split_once(':')?.1,
        };
        let rest = rest
            .trim_start_matches(|c: char| c == ':' || c == '*' || c == '_')
            .trim();
        (!rest.is_empty()).then_some(rest)
    }
}

/// Line up to its first `:`, or the whole line
fn header_part(line: &str) -> &str {
    line.split_once(':').map_or(line, |(head, _)| head)
}

/// Remove markdown heading, emphasis and list numbering around a header
fn strip_decoration(upper: &str) -> &str {
    let trimmed = upper.trim_start_matches(|c: char| c == '#' || c == '*' || c == '_' || c.is_whitespace());
    let without_number = trimmed
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')']);
    let text = if without_number.len() < trimmed.len() {
        without_number
    } else {
        trimmed
    };
    text.trim()
        .trim_end_matches(|c: char| c == ':' || c == '*' || c == '_' || c.is_whitespace())
}

/// Accepts `RISKS`, `RISKS & CHALLENGES`, `RISKS AND CHALLENGES`, `RISKS (2)`;
/// rejects prose such as `RISKS ARE LOW`
fn is_header_tail(rest: &str) -> bool {
    let rest = rest.trim_start();
    match rest.chars().next() {
        None => true,
        Some(c) if !c.is_alphanumeric() => true,
        Some(_) => rest.starts_with("AND "),
    }
}

/// Section whose marker appears on this line, if any
pub fn classify_line(line: &str) -> Option<SummarySection> {
    marker(line).map(|(section, _)| section)
}

fn marker(line: &str) -> Option<(SummarySection, MarkerRule)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_uppercase();

    MARKER_TABLE
        .iter()
        .find(|(_, rule)| rule.matches(trimmed, &upper))
        .copied()
}

/// Parse model output into sections.
///
/// Lines after a marker up to the next marker form that section's text.
/// Text before the first marker is discarded. Never fails: output without any
/// marker yields an empty map.
pub fn parse_sections(text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<SummarySection> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some((section, rule)) = marker(line) {
            flush(&mut sections, current, &mut buffer);
            current = Some(section);
            if let Some(rest) = rule.inline_content(line) {
                buffer.push(rest);
            }
        } else if current.is_some() {
            buffer.push(line);
        }
    }

    flush(&mut sections, current, &mut buffer);
    sections
}

fn flush(sections: &mut SectionMap, current: Option<SummarySection>, buffer: &mut Vec<&str>) {
    if let Some(section) = current {
        let content = buffer.join("\n").trim().to_string();
        sections.insert(section, content);
    }
    buffer.clear();
}
