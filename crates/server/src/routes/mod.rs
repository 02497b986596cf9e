use actix_web::web;
use docbrief_common::DocBriefError;
use docbrief_llm::{ContextProfile, RoleProfile};

use crate::error::ApiError;

pub mod refine;
pub mod summarize;
pub mod system;

/// Register all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health)
        .service(summarize::summarize)
        .service(refine::refine)
        .service(refine::rewrite);
}

/// Strict context lookup; absent means `general`
pub(crate) fn parse_context(name: Option<&str>) -> Result<ContextProfile, ApiError> {
    match name {
        None => Ok(ContextProfile::default()),
        Some(name) => name
            .parse()
            .map_err(|e: DocBriefError| ApiError::bad_request("INVALID_CONTEXT", e.to_string())),
    }
}

/// Strict role lookup; absent means no role instruction
pub(crate) fn parse_role(name: Option<&str>) -> Result<Option<RoleProfile>, ApiError> {
    name.map(|name| {
        name.parse()
            .map_err(|e: DocBriefError| ApiError::bad_request("INVALID_ROLE", e.to_string()))
    })
    .transpose()
}
