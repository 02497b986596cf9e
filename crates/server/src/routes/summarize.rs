use actix_web::{post, web, HttpResponse};
use docbrief_llm::{combine_documents, SourceDocument};
use tracing::info;

use super::{parse_context, parse_role};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{SummarizeRequest, SummarizeResponse, SummaryMetadata};

#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let context = parse_context(req.context_type.as_deref())?;
    let role = parse_role(req.role.as_deref())?;

    let file_names: Vec<String> = req.documents.iter().map(|d| d.name.clone()).collect();
    let text = if req.documents.is_empty() {
        req.text.unwrap_or_default()
    } else {
        let documents: Vec<SourceDocument> = req.documents.into_iter().map(Into::into).collect();
        combine_documents(&documents)
    };

    if text.trim().is_empty() {
        return Err(ApiError::bad_request("NO_TEXT", "No text provided to summarize"));
    }

    info!(
        "Summarize request - {} document(s), context: {}, hybrid: {}",
        file_names.len().max(1),
        context,
        req.hybrid
    );

    let (outcome, keywords, sections, extractive) = if req.hybrid {
        let hybrid = state.summarizer.summarize_hybrid(&text, context, role).await?;
        (
            hybrid.outcome,
            Some(hybrid.keywords),
            Some(hybrid.sections),
            Some(hybrid.extractive),
        )
    } else {
        let outcome = state.summarizer.summarize(&text, context, role).await?;
        (outcome, None, None, None)
    };

    let metadata = SummaryMetadata {
        context_type: context.to_string(),
        role: role.map(|r| r.to_string()),
        file_names,
        chunk_count: outcome.chunk_count,
        revision: outcome.revision,
        updated_at: outcome.updated_at,
        degraded: outcome.is_degraded(),
        degradations: outcome.degradations,
    };

    Ok(HttpResponse::Ok().json(SummarizeResponse {
        content: outcome.summary,
        metadata,
        keywords,
        sections,
        extractive_summary: extractive,
    }))
}
