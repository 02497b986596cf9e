//! DocBrief summarization core
//!
//! Chunking, prompt construction, model gateways, section parsing and the
//! summary orchestrator with its refinement flows.

mod chunking;
mod client;
mod detect;
mod document;
mod extractive;
mod gateway;
mod gemini;
mod keywords;
mod mock;
mod prompts;
mod sections;
mod summarize;
mod types;

pub use chunking::{chunk_text, split_paragraphs, truncate_chars, TextChunk};
pub use client::OllamaClient;
pub use detect::{detect_sections, DocumentSection, MAX_SECTION_CHARS};
pub use document::{combine_documents, normalize_whitespace};
pub use extractive::{leading_sentences, select_sentences};
pub use gateway::{build_gateway, DeadlineGateway, GenerationError, ModelGateway};
pub use gemini::GeminiClient;
pub use keywords::{
    extract_keywords, frequency_keywords, parse_keyword_list, ExtractedKeywords, KeywordSource,
};
pub use mock::MockGateway;
pub use prompts::{PromptBuilder, PromptRequest, RefineInstruction, FORMAT_DIRECTIVE};
pub use sections::{classify_line, parse_sections, SectionMap, SummarySection};
pub use summarize::{RefineRequest, Summarizer, SummarizerSettings};
pub use types::{
    ContextProfile, Degradation, HybridOutcome, Refinement, RefinementAction, Rewrite,
    RoleProfile, SourceDocument, StructuredSummary, SummaryOutcome, FALLBACK_INSIGHTS,
    INSIGHTS_PLACEHOLDER, OVERVIEW_PLACEHOLDER,
};
