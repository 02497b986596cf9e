//! DocBrief HTTP Server
//!
//! Actix-web JSON API over the summarization pipeline

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use docbrief_common::{AppConfig, Result};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use state::AppState;

/// Largest accepted JSON body
const MAX_JSON_BYTES: usize = 10 * 1024 * 1024;

/// JSON extractor settings; malformed bodies answer with `INVALID_JSON`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BYTES)
        .error_handler(|err, _req| ApiError::bad_request("INVALID_JSON", err.to_string()).into())
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    info!("Starting DocBrief server on {}", bind_addr);
    info!("Model backend: {}", state.summarizer.backend());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .app_data(json_config())
            .service(web::scope("/api").configure(routes::configure))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
