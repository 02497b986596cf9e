use actix_web::{post, web, HttpResponse};
use docbrief_llm::RefineInstruction;
use tracing::info;

use super::{parse_context, parse_role};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{RefineRequest, RefineResponse, RewriteRequest, RewriteResponse};

/// Shorten, refine or regenerate an existing summary
#[post("/refine")]
pub async fn refine(
    req: web::Json<RefineRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let context = parse_context(req.context_type.as_deref())?;
    let role = parse_role(req.role.as_deref())?;

    info!("Refine request - action: {}", req.action);

    let request = docbrief_llm::RefineRequest {
        existing: &req.content,
        action: &req.action,
        context,
        role,
        revision: req.revision.unwrap_or(1),
        source_text: req.source_text.as_deref(),
    };
    let refinement = state.summarizer.refine(request).await?;

    Ok(HttpResponse::Ok().json(RefineResponse {
        degraded: refinement.is_degraded(),
        content: refinement.summary,
        action: refinement.action,
        revision: refinement.revision,
        updated_at: refinement.updated_at,
        degradations: refinement.degradations,
    }))
}

/// Free-form rewrite of a text in a given style
#[post("/rewrite")]
pub async fn rewrite(
    req: web::Json<RewriteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let instruction = RefineInstruction::from_style(&req.style, req.focus.as_deref())
        .map_err(|e| ApiError::bad_request("INVALID_STYLE", e.to_string()))?;

    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("NO_TEXT", "No text provided to rewrite"));
    }

    info!("Rewrite request - style: {}", req.style);
    let rewrite = state.summarizer.rewrite(&req.text, &instruction).await;

    Ok(HttpResponse::Ok().json(RewriteResponse {
        degraded: rewrite.degradation.is_some(),
        text: rewrite.text,
        degradation: rewrite.degradation,
    }))
}
