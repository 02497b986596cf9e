use async_trait::async_trait;
use docbrief_common::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::gateway::{non_empty, GenerationError, ModelGateway};

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model name (e.g., "llama3.2", "gemma2")
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Disable streaming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Generation options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

/// Generation options
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateOptions {
    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

/// Ollama generate response
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub response: String,

    /// Whether generation is complete
    #[serde(default)]
    pub done: bool,
}

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    options: GenerateOptions,
    client: Client,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama client initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            model,
            timeout,
            options: GenerateOptions {
                temperature: Some(0.3),
                top_p: Some(0.9),
                num_predict: None,
            },
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_for(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: Some(false),
            options: Some(self.options.clone()),
        }
    }

    /// Single attempt to generate text
    async fn try_generate(&self, request: &GenerateRequest) -> std::result::Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?
            .error_for_status()
            .map_err(|e| GenerationError::unavailable(format!("Ollama API error: {}", e)))?;

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.classify(e))?;

        non_empty(result.response)
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            GenerationError::unavailable(format!("Ollama request failed: {}", err))
        }
    }
}

#[async_trait]
impl ModelGateway for OllamaClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        debug!(
            "Sending generate request to Ollama - Model: {}, Prompt length: {}",
            self.model,
            prompt.len()
        );

        let request = self.request_for(prompt);
        let response = self.try_generate(&request).await?;

        debug!("Received response from Ollama - Length: {}", response.len());
        Ok(response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            OllamaClient::new("http://localhost:11434/", "llama3.2", Duration::from_secs(5)).unwrap();
        assert_eq!(client.model(), "llama3.2");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_request_serialization() {
        let client =
            OllamaClient::new("http://localhost:11434", "llama3.2", Duration::from_secs(5)).unwrap();
        let request = client.request_for("Summarize this");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        assert!(json["options"].get("num_predict").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"model":"llama3.2","response":"[OVERVIEW]\nHi","done":true}"#)
                .unwrap();
        assert!(response.done);
        assert!(response.response.starts_with("[OVERVIEW]"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Port 9 (discard) is not expected to host an Ollama server
        let client =
            OllamaClient::new("http://127.0.0.1:9", "llama3.2", Duration::from_secs(2)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Unavailable(_) | GenerationError::Timeout(_)
        ));
    }
}
