use async_trait::async_trait;
use docbrief_common::{AppConfig, DocBriefError, LlmBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::client::OllamaClient;
use crate::gemini::GeminiClient;
use crate::types::Degradation;

/// Failure of a single model invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Network, quota, auth or protocol failure
    #[error("model backend unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its time budget
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with no usable text
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl GenerationError {
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Degradation recorded when this failure is recovered locally
    pub fn degradation(&self) -> Degradation {
        match self {
            Self::Unavailable(_) => Degradation::GatewayUnavailable,
            Self::Timeout(_) => Degradation::GatewayTimeout,
            Self::EmptyResponse => Degradation::GatewayEmptyResponse,
        }
    }
}

impl From<GenerationError> for DocBriefError {
    fn from(err: GenerationError) -> Self {
        DocBriefError::llm(err.to_string())
    }
}

/// Text-in, text-out capability over a generative backend.
///
/// Implementations must tolerate concurrent calls from independent requests.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate text from a prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logs and health reports
    fn name(&self) -> &str;
}

/// Construct the gateway selected by the configuration
pub fn build_gateway(config: &AppConfig) -> docbrief_common::Result<Arc<dyn ModelGateway>> {
    let timeout = Duration::from_secs(config.llm_timeout_secs);
    info!("Using {} backend", config.llm_backend.as_str());

    match config.llm_backend {
        LlmBackend::Ollama => Ok(Arc::new(OllamaClient::new(
            &config.ollama_base_url,
            &config.llm_model,
            timeout,
        )?)),
        LlmBackend::Gemini => {
            let api_key = config
                .gemini_api_key
                .as_deref()
                .ok_or_else(|| DocBriefError::config("GEMINI_API_KEY is required for the gemini backend"))?;
            Ok(Arc::new(GeminiClient::new(
                &config.gemini_base_url,
                api_key,
                &config.gemini_model,
                timeout,
            )?))
        }
    }
}

/// Reject blank model output
pub(crate) fn non_empty(text: String) -> Result<String, GenerationError> {
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Gateway bounding every call of an inner gateway by a deadline and
/// rejecting blank output
#[derive(Clone)]
pub struct DeadlineGateway {
    inner: Arc<dyn ModelGateway>,
    limit: Duration,
}

impl DeadlineGateway {
    pub fn new(inner: Arc<dyn ModelGateway>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl ModelGateway for DeadlineGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.limit, self.inner.generate(prompt)).await {
            Ok(result) => non_empty(result?),
            Err(_) => {
                warn!("{} call exceeded {:?}", self.inner.name(), self.limit);
                Err(GenerationError::Timeout(self.limit))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
