use docbrief_common::{AppConfig, Result};
use docbrief_llm::{build_gateway, ModelGateway, Summarizer, SummarizerSettings};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summarization pipeline
    pub summarizer: Arc<Summarizer>,
}

impl AppState {
    /// Create state with the gateway selected by `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let gateway = build_gateway(&config)?;
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create state around an explicit gateway
    pub fn with_gateway(config: AppConfig, gateway: Arc<dyn ModelGateway>) -> Self {
        let settings = SummarizerSettings::from(&config);
        Self {
            config,
            summarizer: Arc::new(Summarizer::new(gateway, settings)),
        }
    }
}
