use chrono::{DateTime, Utc};
use docbrief_common::DocBriefError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::detect::DocumentSection;
use crate::sections::{SectionMap, SummarySection};

/// Placeholder used when the model output carries no overview
pub const OVERVIEW_PLACEHOLDER: &str = "Summary not available";

/// Placeholder used when the model output carries no key insights
pub const INSIGHTS_PLACEHOLDER: &str = "No insights available";

/// Key insights text used by the extractive fallback when no sentence qualifies
pub const FALLBACK_INSIGHTS: &str = "Please try regenerating for detailed insights.";

/// Audience lens applied to summarization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextProfile {
    Executive,
    Student,
    Analyst,
    #[default]
    General,
}

impl ContextProfile {
    pub const ALL: [ContextProfile; 4] = [
        ContextProfile::Executive,
        ContextProfile::Student,
        ContextProfile::Analyst,
        ContextProfile::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::Student => "student",
            Self::Analyst => "analyst",
            Self::General => "general",
        }
    }

    /// Lenient lookup: unknown names fall back to `General`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Sections named in the request body of a structured prompt
    pub fn requested_sections(&self) -> &'static [SummarySection] {
        match self {
            Self::Executive | Self::Analyst => &[
                SummarySection::Overview,
                SummarySection::KeyInsights,
                SummarySection::Risks,
                SummarySection::Recommendations,
            ],
            Self::Student | Self::General => {
                &[SummarySection::Overview, SummarySection::KeyInsights]
            }
        }
    }

    pub fn includes(&self, section: SummarySection) -> bool {
        self.requested_sections().contains(&section)
    }
}

impl fmt::Display for ContextProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextProfile {
    type Err = DocBriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "executive" => Ok(Self::Executive),
            "student" => Ok(Self::Student),
            "analyst" => Ok(Self::Analyst),
            "general" => Ok(Self::General),
            other => Err(DocBriefError::invalid_profile(format!(
                "Invalid context type '{}'. Must be one of: executive, student, analyst, general",
                other
            ))),
        }
    }
}

/// Secondary audience lens adjusting tone and focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleProfile {
    Student,
    Researcher,
    #[default]
    Professional,
}

impl RoleProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Researcher => "researcher",
            Self::Professional => "professional",
        }
    }

    /// Lenient lookup: unknown names fall back to `Professional`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for RoleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleProfile {
    type Err = DocBriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "researcher" => Ok(Self::Researcher),
            "professional" => Ok(Self::Professional),
            other => Err(DocBriefError::invalid_profile(format!(
                "Invalid role '{}'. Must be one of: student, researcher, professional",
                other
            ))),
        }
    }
}

/// Four-field summary produced by a summarization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    /// Main summary (never empty)
    pub overview: String,

    /// Key findings (never empty)
    pub key_insights: String,

    /// Risks and challenges, empty when not requested
    #[serde(default)]
    pub risks: String,

    /// Actionable next steps, empty when not requested
    #[serde(default)]
    pub recommendations: String,
}

impl StructuredSummary {
    pub fn new(
        overview: impl Into<String>,
        key_insights: impl Into<String>,
        risks: impl Into<String>,
        recommendations: impl Into<String>,
    ) -> Self {
        Self {
            overview: overview.into(),
            key_insights: key_insights.into(),
            risks: risks.into(),
            recommendations: recommendations.into(),
        }
    }

    /// Build a fully populated summary from parsed sections.
    ///
    /// Missing required sections receive placeholder text; optional sections
    /// are kept only when `context` requests them. The flag is `true` when a
    /// required section had to be backfilled.
    pub fn from_sections(mut sections: SectionMap, context: ContextProfile) -> (Self, bool) {
        let mut take = |section: SummarySection| {
            sections
                .remove(&section)
                .filter(|text| !text.trim().is_empty())
        };

        let overview = take(SummarySection::Overview);
        let key_insights = take(SummarySection::KeyInsights);
        let risks = take(SummarySection::Risks);
        let recommendations = take(SummarySection::Recommendations);

        let incomplete = overview.is_none() || key_insights.is_none();

        let optional = |text: Option<String>, section: SummarySection| {
            if context.includes(section) {
                text.unwrap_or_default()
            } else {
                String::new()
            }
        };

        let summary = Self {
            overview: overview.unwrap_or_else(|| OVERVIEW_PLACEHOLDER.to_string()),
            key_insights: key_insights.unwrap_or_else(|| INSIGHTS_PLACEHOLDER.to_string()),
            risks: optional(risks, SummarySection::Risks),
            recommendations: optional(recommendations, SummarySection::Recommendations),
        };

        (summary, incomplete)
    }

    /// All non-empty fields joined by blank lines, in section order
    pub fn combined_text(&self) -> String {
        [
            &self.overview,
            &self.key_insights,
            &self.risks,
            &self.recommendations,
        ]
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
    }

    pub fn field(&self, section: SummarySection) -> &str {
        match section {
            SummarySection::Overview => &self.overview,
            SummarySection::KeyInsights => &self.key_insights,
            SummarySection::Risks => &self.risks,
            SummarySection::Recommendations => &self.recommendations,
        }
    }

    pub fn field_mut(&mut self, section: SummarySection) -> &mut String {
        match section {
            SummarySection::Overview => &mut self.overview,
            SummarySection::KeyInsights => &mut self.key_insights,
            SummarySection::Risks => &mut self.risks,
            SummarySection::Recommendations => &mut self.recommendations,
        }
    }
}

/// Operation applied to an existing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinementAction {
    Shorten,
    Refine,
    Regenerate,
}

impl RefinementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shorten => "shorten",
            Self::Refine => "refine",
            Self::Regenerate => "regenerate",
        }
    }

    /// Fields rewritten in place by `shorten` and `refine`
    pub const PER_FIELD_SECTIONS: [SummarySection; 2] =
        [SummarySection::Overview, SummarySection::KeyInsights];
}

impl fmt::Display for RefinementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefinementAction {
    type Err = DocBriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shorten" => Ok(Self::Shorten),
            "refine" => Ok(Self::Refine),
            "regenerate" => Ok(Self::Regenerate),
            other => Err(DocBriefError::invalid_action(format!(
                "Invalid action '{}'. Must be one of: shorten, refine, regenerate",
                other
            ))),
        }
    }
}

/// Recoverable condition recorded on an outcome instead of being raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Degradation {
    /// Backend unreachable, rejected the call or returned garbage
    GatewayUnavailable,
    /// Call exceeded its time budget
    GatewayTimeout,
    /// Backend answered with blank text
    GatewayEmptyResponse,
    /// Model output lacked one or more required section markers
    ParseIncomplete,
    /// Regeneration worked from previously generated text, not the source
    RegeneratedFromSummary,
}

impl Degradation {
    pub(crate) fn record(list: &mut Vec<Degradation>, degradation: Degradation) {
        if !list.contains(&degradation) {
            list.push(degradation);
        }
    }
}

/// Extracted text of one input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Display name (usually the original file name)
    pub name: String,

    /// Plain text content
    pub text: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Result of a fresh summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutcome {
    pub summary: StructuredSummary,

    /// Revision marker, starts at 1
    pub revision: u64,

    pub updated_at: DateTime<Utc>,

    /// Number of chunks the source was split into
    pub chunk_count: usize,

    #[serde(default)]
    pub degradations: Vec<Degradation>,
}

impl SummaryOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Structured summary enriched with model-independent analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridOutcome {
    #[serde(flatten)]
    pub outcome: SummaryOutcome,

    /// Salient terms, ranked
    pub keywords: Vec<String>,

    /// Conventional document sections found in the source
    pub sections: BTreeMap<DocumentSection, String>,

    /// Keyword-scored sentence extract
    pub extractive: String,
}

/// Result of a refinement call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refinement {
    pub summary: StructuredSummary,

    pub action: RefinementAction,

    /// Previous revision + 1
    pub revision: u64,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub degradations: Vec<Degradation>,
}

impl Refinement {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Result of a free-form rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub text: String,

    /// Set when the model call failed and `text` is the unmodified input
    pub degradation: Option<Degradation>,
}
