use chrono::{DateTime, Utc};
use docbrief_llm::{Degradation, DocumentSection, RefinementAction, SourceDocument, StructuredSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extracted document supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Original file name
    #[serde(default)]
    pub name: String,

    /// Plain text content
    pub text: String,
}

impl From<DocumentInput> for SourceDocument {
    fn from(input: DocumentInput) -> Self {
        SourceDocument::new(input.name, input.text)
    }
}

/// POST /api/summarize
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Documents to summarize together
    #[serde(default)]
    pub documents: Vec<DocumentInput>,

    /// Raw text, used when no documents are given
    pub text: Option<String>,

    pub context_type: Option<String>,
    pub role: Option<String>,

    /// Add keywords, detected sections and an extractive selection
    #[serde(default)]
    pub hybrid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    pub context_type: String,
    pub role: Option<String>,
    pub file_names: Vec<String>,
    pub chunk_count: usize,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
    pub degraded: bool,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub content: StructuredSummary,
    pub metadata: SummaryMetadata,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<BTreeMap<DocumentSection, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractive_summary: Option<String>,
}

/// POST /api/refine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    /// Summary previously returned by /api/summarize or /api/refine
    pub content: StructuredSummary,
    pub action: String,
    pub context_type: Option<String>,
    pub role: Option<String>,

    /// Revision of `content`; 1 when omitted
    pub revision: Option<u64>,

    /// Original document text, if kept by the caller
    pub source_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub content: StructuredSummary,
    pub action: RefinementAction,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
    pub degraded: bool,
    pub degradations: Vec<Degradation>,
}

/// POST /api/rewrite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub text: String,

    /// shorten, clarify, expand, focus_methods, focus_results or focus
    pub style: String,

    /// Aspect to emphasise for the `focus` style
    pub focus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub text: String,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degradation: Option<Degradation>,
}

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
}
