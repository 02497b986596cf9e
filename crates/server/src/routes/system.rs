use actix_web::{get, web, HttpResponse};
use tracing::debug;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness and backend report
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check");

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        backend: state.summarizer.backend().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
