use std::sync::Arc;
use std::time::Duration;

use docbrief_llm::{
    chunk_text, parse_sections, split_paragraphs, ContextProfile, Degradation, GenerationError,
    MockGateway, PromptBuilder, PromptRequest, RefineRequest, SourceDocument, StructuredSummary,
    Summarizer, SummarizerSettings, SummarySection,
};

fn summarizer(gateway: &MockGateway, settings: SummarizerSettings) -> Summarizer {
    Summarizer::new(Arc::new(gateway.clone()), settings)
}

#[tokio::test]
async fn end_to_end_single_chunk() {
    let text = "Para one here.\n\nPara two here.\n\nPara three ok.";
    assert_eq!(text.chars().count(), 46);

    let chunks = chunk_text(text, 3000);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);

    let builder = PromptBuilder::default();
    let prompt = builder.build(&PromptRequest::new(text, ContextProfile::General));
    assert!(prompt.contains(ContextProfile::General.instruction()));
    assert!(prompt.contains(text));

    let output = "[OVERVIEW]\nHello world.\n[KEY INSIGHTS]\n- point one";
    let sections = parse_sections(output);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[&SummarySection::Overview], "Hello world.");
    assert_eq!(sections[&SummarySection::KeyInsights], "- point one");

    let gateway = MockGateway::new(output);
    let outcome = summarizer(&gateway, SummarizerSettings::default())
        .summarize(text, ContextProfile::General, None)
        .await
        .unwrap();
    assert_eq!(outcome.summary, StructuredSummary::new("Hello world.", "- point one", "", ""));
    assert!(!outcome.is_degraded());
}

#[tokio::test]
async fn fallback_guarantee_when_gateway_is_down() {
    let gateway = MockGateway::failing(GenerationError::unavailable("connection refused"));
    let settings = SummarizerSettings {
        chunk_max_chars: 80,
        ..SummarizerSettings::default()
    };
    let text = (0..6)
        .map(|i| format!("Paragraph {} discusses supply chain delays in detail.", i))
        .collect::<Vec<_>>()
        .join("\n\n");

    for context in ContextProfile::ALL {
        let outcome = summarizer(&gateway, settings.clone())
            .summarize(&text, context, None)
            .await
            .unwrap();
        assert!(outcome.chunk_count > 1);
        assert!(!outcome.summary.overview.trim().is_empty());
        assert!(!outcome.summary.key_insights.trim().is_empty());
        assert_eq!(outcome.degradations, vec![Degradation::GatewayUnavailable]);
    }
}

#[tokio::test]
async fn refinement_never_destroys_content() {
    let gateway = MockGateway::failing(GenerationError::Timeout(Duration::from_secs(120)));
    let existing = StructuredSummary::new("Overview.", "- insight", "- risk", "- rec");
    let summarizer = summarizer(&gateway, SummarizerSettings::default());

    let refinement = summarizer
        .refine(RefineRequest::new(&existing, "shorten"))
        .await
        .unwrap();

    assert_eq!(refinement.summary, existing);
    assert_eq!(refinement.degradations, vec![Degradation::GatewayTimeout]);
    assert_eq!(refinement.revision, 2);
}

#[tokio::test]
async fn regenerate_without_sections_keeps_content() {
    let gateway = MockGateway::new("no markers here");
    let existing = StructuredSummary::new("Overview.", "- insight", "- risk", "- rec");
    let summarizer = summarizer(&gateway, SummarizerSettings::default());

    let refinement = summarizer
        .refine(RefineRequest::new(&existing, "regenerate"))
        .await
        .unwrap();

    assert_eq!(refinement.summary, existing);
    assert_eq!(
        refinement.degradations,
        vec![Degradation::RegeneratedFromSummary, Degradation::ParseIncomplete]
    );
}

#[tokio::test]
async fn keyword_fallback_is_deterministic() {
    let gateway = MockGateway::failing(GenerationError::unavailable("quota exceeded"));
    let settings = SummarizerSettings {
        keyword_top_n: 2,
        ..SummarizerSettings::default()
    };
    let summarizer = summarizer(&gateway, settings);

    for _ in 0..3 {
        let extracted = summarizer
            .extract_keywords("the quick quick fox fox fox jumps")
            .await;
        assert_eq!(extracted.keywords, vec!["fox", "quick"]);
    }
}

#[tokio::test]
async fn slow_backend_times_out_without_stalling() {
    let gateway = MockGateway::new("[OVERVIEW]\nLate.\n[KEY INSIGHTS]\n- late")
        .with_delay(Duration::from_secs(5));
    let settings = SummarizerSettings {
        call_timeout: Duration::from_millis(50),
        ..SummarizerSettings::default()
    };

    let started = std::time::Instant::now();
    let outcome = summarizer(&gateway, settings)
        .summarize("A document that will not be summarized in time.", ContextProfile::Analyst, None)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(outcome.degradations, vec![Degradation::GatewayTimeout]);
    assert!(outcome.summary.overview.starts_with("A document"));
}

#[tokio::test]
async fn multiple_documents_are_combined() {
    let gateway = MockGateway::new("[OVERVIEW]\nBoth.\n[KEY INSIGHTS]\n- two docs");
    let documents = vec![
        SourceDocument::new("q1.txt", "First quarter revenue."),
        SourceDocument::new("q2.txt", "Second quarter revenue."),
    ];

    let outcome = summarizer(&gateway, SummarizerSettings::default())
        .summarize_documents(&documents, ContextProfile::Executive, None)
        .await
        .unwrap();

    assert_eq!(outcome.summary.overview, "Both.");
    let prompt = &gateway.prompts()[0];
    assert!(prompt.contains("=== Document: q1.txt ===\n\nFirst quarter revenue."));
    assert!(prompt.contains("=== Document: q2.txt ===\n\nSecond quarter revenue."));
}

#[test]
fn chunks_preserve_paragraphs() {
    let text = (0..20)
        .map(|i| format!("Paragraph {} {}", i, "word ".repeat(i % 7 + 1)))
        .collect::<Vec<_>>()
        .join("\n\n");

    for max in [10, 40, 120, 500] {
        let chunks = chunk_text(&text, max);
        let rejoined = chunks
            .iter()
            .map(|c| c.text.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        assert_eq!(split_paragraphs(&rejoined), split_paragraphs(&text));
    }
}
