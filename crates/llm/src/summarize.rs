use chrono::Utc;
use docbrief_common::{AppConfig, DocBriefError, Result};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chunking::{chunk_text, TextChunk};
use crate::detect::detect_sections;
use crate::document::combine_documents;
use crate::extractive::{leading_sentences, select_sentences};
use crate::gateway::{DeadlineGateway, ModelGateway};
use crate::keywords::{extract_keywords, frequency_keywords, ExtractedKeywords};
use crate::prompts::{PromptBuilder, PromptRequest, RefineInstruction};
use crate::sections::parse_sections;
use crate::types::{
    ContextProfile, Degradation, HybridOutcome, Refinement, RefinementAction, Rewrite,
    RoleProfile, SourceDocument, StructuredSummary, SummaryOutcome, FALLBACK_INSIGHTS,
    OVERVIEW_PLACEHOLDER,
};

/// Tunables of the summarization pipeline
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    /// Maximum characters per chunk
    pub chunk_max_chars: usize,

    /// Deadline of a single model call
    pub call_timeout: Duration,

    /// Sentences kept by the leading-sentence fallback
    pub fallback_sentences: usize,

    /// Keywords requested in hybrid mode
    pub keyword_top_n: usize,

    /// Chunk summaries generated at once
    pub chunk_concurrency: usize,

    pub prompts: PromptBuilder,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SummarizerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            chunk_max_chars: config.chunk_max_chars,
            call_timeout: Duration::from_secs(config.llm_timeout_secs),
            fallback_sentences: config.fallback_sentences,
            keyword_top_n: config.keyword_top_n,
            chunk_concurrency: config.chunk_concurrency,
            prompts: PromptBuilder::new(config.prompt_max_chars, config.keyword_prompt_chars),
        }
    }
}

/// Inputs of a refinement call
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    /// Summary to transform
    pub existing: &'a StructuredSummary,

    /// Raw action name, validated here
    pub action: &'a str,

    pub context: ContextProfile,
    pub role: Option<RoleProfile>,

    /// Revision of `existing`
    pub revision: u64,

    /// Original document text, if the caller kept it
    pub source_text: Option<&'a str>,
}

impl<'a> RefineRequest<'a> {
    pub fn new(existing: &'a StructuredSummary, action: &'a str) -> Self {
        Self {
            existing,
            action,
            context: ContextProfile::default(),
            role: None,
            revision: 1,
            source_text: None,
        }
    }
}

/// Result of the structured generation path
struct Structured {
    summary: StructuredSummary,
    chunk_count: usize,

    /// False when the final model pass failed and the extractive fallback was used
    generated: bool,

    /// Model output lacked required sections and placeholders were filled in
    incomplete: bool,
}

/// Summary orchestrator: chunking, model calls, parsing and fallbacks.
///
/// Stateless between calls; one instance can serve concurrent requests.
pub struct Summarizer {
    gateway: DeadlineGateway,
    settings: SummarizerSettings,
}

impl Summarizer {
    /// Create new summarizer
    pub fn new(gateway: Arc<dyn ModelGateway>, settings: SummarizerSettings) -> Self {
        Self {
            gateway: DeadlineGateway::new(gateway, settings.call_timeout),
            settings,
        }
    }

    /// Name of the model backend
    pub fn backend(&self) -> &str {
        self.gateway.name()
    }

    /// Produce a structured summary of `text`.
    ///
    /// Model failures never surface: they are recorded as degradations and
    /// replaced by extractive fallbacks. Only blank input is an error.
    pub async fn summarize(
        &self,
        text: &str,
        context: ContextProfile,
        role: Option<RoleProfile>,
    ) -> Result<SummaryOutcome> {
        ensure_text(text)?;
        info!(
            "Starting summarization - Text length: {} chars, context: {}",
            text.chars().count(),
            context
        );

        let mut degradations = Vec::new();
        let request = PromptRequest {
            role,
            ..PromptRequest::new(text, context)
        };
        let structured = self.generate_structured(request, &mut degradations).await;

        Ok(self.outcome(structured, degradations))
    }

    /// Summarize several extracted documents as one
    pub async fn summarize_documents(
        &self,
        documents: &[SourceDocument],
        context: ContextProfile,
        role: Option<RoleProfile>,
    ) -> Result<SummaryOutcome> {
        let combined = combine_documents(documents);
        debug!(
            "Combined {} documents into {} chars",
            documents.len(),
            combined.chars().count()
        );
        self.summarize(&combined, context, role).await
    }

    /// Structured summary plus keywords, detected sections and an extractive
    /// selection. The keywords are also fed into the structured prompt.
    pub async fn summarize_hybrid(
        &self,
        text: &str,
        context: ContextProfile,
        role: Option<RoleProfile>,
    ) -> Result<HybridOutcome> {
        ensure_text(text)?;
        info!(
            "Starting hybrid summarization - Text length: {} chars, context: {}",
            text.chars().count(),
            context
        );

        let mut degradations = Vec::new();

        let extracted = self.extract_keywords(text).await;
        if let Some(failure) = &extracted.failure {
            Degradation::record(&mut degradations, failure.degradation());
        }
        let keywords = extracted.keywords;
        debug!("Keywords ({:?}): {:?}", extracted.source, keywords);

        let sections = detect_sections(text);
        let extractive = select_sentences(text, &keywords);
        debug!("Detected {} document sections", sections.len());

        let request = PromptRequest {
            role,
            keywords: &keywords,
            ..PromptRequest::new(text, context)
        };
        let structured = self.generate_structured(request, &mut degradations).await;

        Ok(HybridOutcome {
            outcome: self.outcome(structured, degradations),
            keywords,
            sections,
            extractive,
        })
    }

    /// Salient terms of `text`, model first
    pub async fn extract_keywords(&self, text: &str) -> ExtractedKeywords {
        extract_keywords(
            &self.gateway,
            &self.settings.prompts,
            text,
            self.settings.keyword_top_n,
        )
        .await
    }

    /// Apply a refinement action to an existing summary.
    ///
    /// Fails only for an unknown action. A model failure leaves the affected
    /// fields unchanged and is reported as a degradation.
    pub async fn refine(&self, request: RefineRequest<'_>) -> Result<Refinement> {
        let action: RefinementAction = request.action.parse()?;
        info!("Refining summary - action: {}, revision: {}", action, request.revision);

        let mut degradations = Vec::new();
        let summary = match action {
            RefinementAction::Regenerate => self.regenerate(&request, &mut degradations).await,
            _ => self.refine_fields(&request, action, &mut degradations).await,
        };

        Ok(Refinement {
            summary,
            action,
            revision: request.revision.saturating_add(1),
            updated_at: Utc::now(),
            degradations,
        })
    }

    /// Rewrite free text with an instruction; the input comes back unchanged
    /// on failure
    pub async fn rewrite(&self, text: &str, instruction: &RefineInstruction) -> Rewrite {
        if text.trim().is_empty() {
            return Rewrite {
                text: text.to_string(),
                degradation: None,
            };
        }

        let prompt = self.settings.prompts.refinement(text, instruction);
        match self.gateway.generate(&prompt).await {
            Ok(rewritten) => Rewrite {
                text: rewritten.trim().to_string(),
                degradation: None,
            },
            Err(e) => {
                warn!("Rewrite failed, returning input unchanged: {}", e);
                Rewrite {
                    text: text.to_string(),
                    degradation: Some(e.degradation()),
                }
            }
        }
    }

    fn outcome(&self, structured: Structured, degradations: Vec<Degradation>) -> SummaryOutcome {
        if degradations.is_empty() {
            info!("Summarization complete - {} chunk(s)", structured.chunk_count);
        } else {
            warn!(
                "Summarization complete with degradations {:?} - {} chunk(s)",
                degradations, structured.chunk_count
            );
        }

        SummaryOutcome {
            summary: structured.summary,
            revision: 1,
            updated_at: Utc::now(),
            chunk_count: structured.chunk_count,
            degradations,
        }
    }

    /// Chunk, condense multi-chunk input, then run the structured pass
    async fn generate_structured(
        &self,
        request: PromptRequest<'_>,
        degradations: &mut Vec<Degradation>,
    ) -> Structured {
        let chunks = chunk_text(request.text, self.settings.chunk_max_chars);
        let chunk_count = chunks.len();

        let body = if chunk_count > 1 {
            info!("Split text into {} chunks", chunk_count);
            self.condense_chunks(&chunks, request.context, degradations).await
        } else {
            request.text.to_string()
        };

        let prompt = self.settings.prompts.build(&PromptRequest {
            text: &body,
            ..request
        });
        match self.gateway.generate(&prompt).await {
            Ok(output) => {
                let (summary, incomplete) =
                    StructuredSummary::from_sections(parse_sections(&output), request.context);
                if incomplete {
                    warn!("Model output lacked required sections, placeholders used");
                    Degradation::record(degradations, Degradation::ParseIncomplete);
                }
                Structured {
                    summary,
                    chunk_count,
                    generated: true,
                    incomplete,
                }
            }
            Err(e) => {
                warn!("Structured generation failed, using extractive fallback: {}", e);
                Degradation::record(degradations, e.degradation());
                Structured {
                    summary: self.fallback_summary(request.text),
                    chunk_count,
                    generated: false,
                    incomplete: false,
                }
            }
        }
    }

    /// Plain summary per chunk, in order, joined by single spaces
    async fn condense_chunks(
        &self,
        chunks: &[TextChunk],
        context: ContextProfile,
        degradations: &mut Vec<Degradation>,
    ) -> String {
        let results: Vec<_> = stream::iter(chunks.iter().map(|chunk| {
            let prompt = self.settings.prompts.plain(&chunk.text, context);
            async move { self.gateway.generate(&prompt).await }
        }))
        .buffered(self.settings.chunk_concurrency.max(1))
        .collect()
        .await;

        let mut summaries = Vec::with_capacity(chunks.len());
        for (chunk, result) in chunks.iter().zip(results) {
            match result {
                Ok(summary) => {
                    debug!("Summarized chunk {}/{}", chunk.index + 1, chunks.len());
                    summaries.push(summary.trim().to_string());
                }
                Err(e) => {
                    warn!("Chunk {} failed, using its leading sentences: {}", chunk.index + 1, e);
                    Degradation::record(degradations, e.degradation());
                    summaries.push(leading_sentences(&chunk.text, self.settings.fallback_sentences));
                }
            }
        }

        let combined = summaries.join(" ");
        info!("Combined chunk summaries - Length: {} chars", combined.chars().count());
        combined
    }

    /// Model-free summary: leading sentences and a keyword-scored extract
    fn fallback_summary(&self, text: &str) -> StructuredSummary {
        let overview = leading_sentences(text, self.settings.fallback_sentences);
        let keywords = frequency_keywords(text, self.settings.keyword_top_n);
        let insights = select_sentences(text, &keywords);

        StructuredSummary::new(
            non_blank_or(overview, OVERVIEW_PLACEHOLDER),
            non_blank_or(insights, FALLBACK_INSIGHTS),
            "",
            "",
        )
    }

    /// Rewrite overview and key insights independently
    async fn refine_fields(
        &self,
        request: &RefineRequest<'_>,
        action: RefinementAction,
        degradations: &mut Vec<Degradation>,
    ) -> StructuredSummary {
        let existing = request.existing;
        let targets: Vec<_> = RefinementAction::PER_FIELD_SECTIONS
            .iter()
            .copied()
            .filter(|section| !existing.field(*section).trim().is_empty())
            .collect();

        let results = join_all(targets.iter().map(|section| {
            let prompt = self.settings.prompts.build(&PromptRequest {
                action: Some(action),
                ..PromptRequest::new(existing.field(*section), request.context)
            });
            async move { self.gateway.generate(&prompt).await }
        }))
        .await;

        let mut summary = existing.clone();
        for (section, result) in targets.into_iter().zip(results) {
            match result {
                Ok(text) => *summary.field_mut(section) = text.trim().to_string(),
                Err(e) => {
                    warn!("Refining {} failed, keeping previous text: {}", section, e);
                    Degradation::record(degradations, e.degradation());
                }
            }
        }
        summary
    }

    /// Rebuild the whole summary from the source text, or from the existing
    /// fields when no source was kept
    async fn regenerate(
        &self,
        request: &RefineRequest<'_>,
        degradations: &mut Vec<Degradation>,
    ) -> StructuredSummary {
        let source = match request.source_text.filter(|s| !s.trim().is_empty()) {
            Some(source) => source.to_string(),
            None => {
                Degradation::record(degradations, Degradation::RegeneratedFromSummary);
                request.existing.combined_text()
            }
        };

        if source.trim().is_empty() {
            warn!("Nothing to regenerate from, keeping existing summary");
            return request.existing.clone();
        }

        let structured = self
            .generate_structured(
                PromptRequest {
                    role: request.role,
                    action: Some(RefinementAction::Regenerate),
                    ..PromptRequest::new(&source, request.context)
                },
                degradations,
            )
            .await;

        if structured.generated && !structured.incomplete {
            structured.summary
        } else {
            warn!("Regeneration gave no complete summary, keeping existing one");
            request.existing.clone()
        }
    }
}

fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(DocBriefError::invalid_input("No text to summarize"));
    }
    Ok(())
}

fn non_blank_or(text: String, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GenerationError;
    use crate::mock::MockGateway;
    use crate::types::INSIGHTS_PLACEHOLDER;

    const MODEL_OUTPUT: &str = "[OVERVIEW]\nHello world.\n[KEY INSIGHTS]\n- point one\n[RISKS]\n- churn\n[RECOMMENDATIONS]\n- act";

    fn summarizer(gateway: MockGateway) -> Summarizer {
        Summarizer::new(Arc::new(gateway), SummarizerSettings::default())
    }

    fn settings_with_chunk(max: usize) -> SummarizerSettings {
        SummarizerSettings {
            chunk_max_chars: max,
            ..SummarizerSettings::default()
        }
    }

    fn existing() -> StructuredSummary {
        StructuredSummary::new("Long overview text.", "- insight", "- risk", "- rec")
    }

    #[tokio::test]
    async fn test_single_chunk_uses_one_call() {
        let gateway = MockGateway::new(MODEL_OUTPUT);
        let summarizer = summarizer(gateway.clone());

        let outcome = summarizer
            .summarize("A short document.", ContextProfile::Executive, None)
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(outcome.chunk_count, 1);
        assert_eq!(outcome.revision, 1);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.summary.overview, "Hello world.");
        assert_eq!(outcome.summary.risks, "- churn");
    }

    #[tokio::test]
    async fn test_unrequested_sections_are_blank() {
        let summarizer = summarizer(MockGateway::new(MODEL_OUTPUT));
        let outcome = summarizer
            .summarize("A short document.", ContextProfile::Student, None)
            .await
            .unwrap();
        assert_eq!(outcome.summary.risks, "");
        assert_eq!(outcome.summary.recommendations, "");
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let summarizer = summarizer(MockGateway::new(MODEL_OUTPUT));
        let err = summarizer
            .summarize("  \n", ContextProfile::General, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DocBriefError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_incomplete_output_is_backfilled() {
        let summarizer = summarizer(MockGateway::new("[OVERVIEW]\nOnly this."));
        let outcome = summarizer
            .summarize("Some text.", ContextProfile::General, None)
            .await
            .unwrap();
        assert_eq!(outcome.summary.overview, "Only this.");
        assert_eq!(outcome.summary.key_insights, INSIGHTS_PLACEHOLDER);
        assert_eq!(outcome.degradations, vec![Degradation::ParseIncomplete]);
    }

    #[tokio::test]
    async fn test_multi_chunk_two_pass() {
        let gateway = MockGateway::new(MODEL_OUTPUT)
            .respond_when("Document to summarize:\nFirst", "S1")
            .respond_when("Document to summarize:\nSecond", "S2");
        let summarizer = Summarizer::new(Arc::new(gateway.clone()), settings_with_chunk(30));

        let text = "First paragraph of the text.\n\nSecond paragraph of the text.";
        let outcome = summarizer
            .summarize(text, ContextProfile::General, None)
            .await
            .unwrap();

        assert_eq!(outcome.chunk_count, 2);
        assert_eq!(gateway.call_count(), 3);
        let prompts = gateway.prompts();
        assert!(prompts[2].contains("Document:\nS1 S2\n"));
        assert_eq!(outcome.summary.overview, "Hello world.");
    }

    #[tokio::test]
    async fn test_failed_chunk_degrades_to_leading_sentences() {
        let gateway = MockGateway::new(MODEL_OUTPUT)
            .respond_when("Document to summarize:\nFirst", "S1")
            .fail_when(
                "Document to summarize:\nSecond",
                GenerationError::unavailable("down"),
            );
        let summarizer = Summarizer::new(Arc::new(gateway.clone()), settings_with_chunk(30));

        let text = "First paragraph of the text.\n\nSecond paragraph of the text.";
        let outcome = summarizer
            .summarize(text, ContextProfile::General, None)
            .await
            .unwrap();

        assert_eq!(outcome.degradations, vec![Degradation::GatewayUnavailable]);
        assert!(gateway.prompts()[2].contains("S1 Second paragraph of the text."));
    }

    #[tokio::test]
    async fn test_gateway_failure_uses_extractive_fallback() {
        let summarizer = summarizer(MockGateway::failing(GenerationError::unavailable("down")));
        let text = "Revenue grew strongly this year. Revenue growth came from new markets. Costs stayed flat.";

        let outcome = summarizer
            .summarize(text, ContextProfile::Executive, None)
            .await
            .unwrap();

        assert!(outcome.summary.overview.starts_with("Revenue grew strongly"));
        assert!(outcome.summary.key_insights.contains("Revenue"));
        assert_eq!(outcome.summary.risks, "");
        assert_eq!(outcome.degradations, vec![Degradation::GatewayUnavailable]);
    }

    #[tokio::test]
    async fn test_fallback_insights_placeholder() {
        let summarizer = summarizer(MockGateway::failing(GenerationError::EmptyResponse));
        let outcome = summarizer
            .summarize("Tiny text", ContextProfile::General, None)
            .await
            .unwrap();
        assert_eq!(outcome.summary.overview, "Tiny text.");
        assert_eq!(outcome.summary.key_insights, FALLBACK_INSIGHTS);
    }

    #[tokio::test]
    async fn test_timeout_is_a_degradation() {
        let gateway = MockGateway::new(MODEL_OUTPUT).with_delay(Duration::from_millis(200));
        let settings = SummarizerSettings {
            call_timeout: Duration::from_millis(20),
            ..SummarizerSettings::default()
        };
        let summarizer = Summarizer::new(Arc::new(gateway), settings);

        let outcome = summarizer
            .summarize("One sentence here. Another one.", ContextProfile::General, None)
            .await
            .unwrap();
        assert_eq!(outcome.degradations, vec![Degradation::GatewayTimeout]);
        assert!(!outcome.summary.overview.is_empty());
    }

    #[tokio::test]
    async fn test_hybrid_adds_analysis() {
        let gateway = MockGateway::new(MODEL_OUTPUT).respond_when("Keywords:", "caching, latency");
        let summarizer = summarizer(gateway.clone());
        let text = "Abstract: Edge caching cuts latency for mobile users.\n\nResults: Latency dropped by a third with caching.";

        let hybrid = summarizer
            .summarize_hybrid(text, ContextProfile::Analyst, None)
            .await
            .unwrap();

        assert_eq!(hybrid.keywords, vec!["caching", "latency"]);
        assert_eq!(hybrid.sections.len(), 2);
        assert!(hybrid.extractive.contains("Edge caching cuts latency"));
        assert!(gateway.prompts()[1].contains("Key terms to focus on: caching, latency"));
        assert!(!hybrid.outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_refine_shorten_rewrites_two_fields() {
        let gateway = MockGateway::new("Short.");
        let summarizer = summarizer(gateway.clone());
        let existing = existing();

        let mut request = RefineRequest::new(&existing, "shorten");
        request.revision = 3;
        let refinement = summarizer.refine(request).await.unwrap();

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(refinement.revision, 4);
        assert_eq!(refinement.summary.overview, "Short.");
        assert_eq!(refinement.summary.key_insights, "Short.");
        assert_eq!(refinement.summary.risks, "- risk");
        assert_eq!(refinement.summary.recommendations, "- rec");
    }

    #[tokio::test]
    async fn test_refine_failure_keeps_summary() {
        let summarizer = summarizer(MockGateway::failing(GenerationError::unavailable("down")));
        let existing = existing();

        for action in ["shorten", "refine", "regenerate"] {
            let refinement = summarizer
                .refine(RefineRequest::new(&existing, action))
                .await
                .unwrap();
            assert_eq!(refinement.summary, existing, "action {}", action);
            assert_eq!(refinement.revision, 2);
            assert!(refinement.is_degraded());
        }
    }

    #[tokio::test]
    async fn test_refine_partial_failure() {
        let gateway = MockGateway::new("Better.")
            .fail_when("- insight", GenerationError::Timeout(Duration::from_secs(1)));
        let summarizer = summarizer(gateway);
        let existing = existing();

        let refinement = summarizer
            .refine(RefineRequest::new(&existing, "refine"))
            .await
            .unwrap();
        assert_eq!(refinement.summary.overview, "Better.");
        assert_eq!(refinement.summary.key_insights, "- insight");
        assert_eq!(refinement.degradations, vec![Degradation::GatewayTimeout]);
    }

    #[tokio::test]
    async fn test_refine_unknown_action() {
        let summarizer = summarizer(MockGateway::new("x"));
        let existing = existing();
        let err = summarizer
            .refine(RefineRequest::new(&existing, "expand"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocBriefError::InvalidAction(_)));
    }

    #[tokio::test]
    async fn test_regenerate_prefers_source_text() {
        let gateway = MockGateway::new(MODEL_OUTPUT);
        let summarizer = summarizer(gateway.clone());
        let existing = existing();

        let mut request = RefineRequest::new(&existing, "regenerate");
        request.context = ContextProfile::Executive;
        request.source_text = Some("The original report body.");
        let refinement = summarizer.refine(request).await.unwrap();

        assert!(gateway.prompts()[0].contains("The original report body."));
        assert_eq!(refinement.summary.overview, "Hello world.");
        assert!(!refinement.is_degraded());

        let refinement = summarizer
            .refine(RefineRequest::new(&existing, "regenerate"))
            .await
            .unwrap();
        assert!(gateway.prompts()[1].contains("Long overview text.\n\n- insight"));
        assert_eq!(refinement.degradations, vec![Degradation::RegeneratedFromSummary]);
    }

    #[tokio::test]
    async fn test_regenerate_unparseable_output_keeps_summary() {
        let existing = StructuredSummary::new("Real overview.", "- real insight", "- risk", "- rec");

        for output in [
            "Sorry, I cannot produce that format.",
            "[OVERVIEW]\nOnly an overview this time.",
        ] {
            let summarizer = summarizer(MockGateway::new(output));
            let mut request = RefineRequest::new(&existing, "regenerate");
            request.context = ContextProfile::Executive;
            request.source_text = Some("The original report body.");

            let refinement = summarizer.refine(request).await.unwrap();
            assert_eq!(refinement.summary, existing, "output {:?}", output);
            assert_eq!(refinement.degradations, vec![Degradation::ParseIncomplete]);
            assert_eq!(refinement.revision, 2);
        }
    }

    #[tokio::test]
    async fn test_refine_prompts_follow_action() {
        let gateway = MockGateway::new("Rewritten.");
        let summarizer = summarizer(gateway.clone());
        let existing = existing();

        summarizer
            .refine(RefineRequest::new(&existing, "shorten"))
            .await
            .unwrap();
        let prompts = gateway.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts.iter().all(|p| p.contains("50% reduction")));
        assert!(prompts.iter().any(|p| p.contains("Long overview text.")));
    }

    #[tokio::test]
    async fn test_rewrite() {
        let summarizer = summarizer(MockGateway::new("  Focused text. "));
        let rewrite = summarizer
            .rewrite("Some text.", &RefineInstruction::Focus("pricing".to_string()))
            .await;
        assert_eq!(rewrite.text, "Focused text.");
        assert_eq!(rewrite.degradation, None);

        let failing = Summarizer::new(
            Arc::new(MockGateway::failing(GenerationError::EmptyResponse)),
            SummarizerSettings::default(),
        );
        let rewrite = failing.rewrite("Some text.", &RefineInstruction::Expand).await;
        assert_eq!(rewrite.text, "Some text.");
        assert_eq!(rewrite.degradation, Some(Degradation::GatewayEmptyResponse));
    }
}
