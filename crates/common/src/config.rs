use crate::error::DocBriefError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Generative backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    Ollama,
    /// Google Gemini API
    Gemini,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = DocBriefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(DocBriefError::config(format!(
                "Unknown LLM backend '{}' (expected ollama or gemini)",
                other
            ))),
        }
    }
}

/// DocBrief application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative backend
    pub llm_backend: LlmBackend,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Ollama summarization model name
    pub llm_model: String,

    /// Gemini API key
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    pub gemini_model: String,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Per-call timeout for model invocations (seconds)
    pub llm_timeout_secs: u64,

    /// Maximum characters per chunk
    pub chunk_max_chars: usize,

    /// Maximum characters of source text embedded in a prompt
    pub prompt_max_chars: usize,

    /// Maximum characters of source text sent for keyword extraction
    pub keyword_prompt_chars: usize,

    /// Number of keywords to extract
    pub keyword_top_n: usize,

    /// Number of leading sentences used by the extractive fallback
    pub fallback_sentences: usize,

    /// Number of chunk summaries generated concurrently
    pub chunk_concurrency: usize,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_backend: LlmBackend::Ollama,
            ollama_base_url: "http://localhost:11434".to_string(),
            llm_model: "llama3.2:latest".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            llm_timeout_secs: 120,
            chunk_max_chars: 30_000,
            prompt_max_chars: 50_000,
            keyword_prompt_chars: 10_000,
            keyword_top_n: 15,
            fallback_sentences: 5,
            chunk_concurrency: 2,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DocBriefError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let llm_backend = match std::env::var("LLM_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.llm_backend,
        };

        let config = Self {
            llm_backend,
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            llm_model: std::env::var("LLM_MODEL").unwrap_or(defaults.llm_model),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            llm_timeout_secs: Self::get_env_parsed("LLM_TIMEOUT_SECS")
                .unwrap_or(defaults.llm_timeout_secs),
            chunk_max_chars: Self::get_env_parsed("CHUNK_MAX_CHARS")
                .unwrap_or(defaults.chunk_max_chars),
            prompt_max_chars: Self::get_env_parsed("PROMPT_MAX_CHARS")
                .unwrap_or(defaults.prompt_max_chars),
            keyword_prompt_chars: Self::get_env_parsed("KEYWORD_PROMPT_CHARS")
                .unwrap_or(defaults.keyword_prompt_chars),
            keyword_top_n: Self::get_env_parsed("KEYWORD_TOP_N")
                .unwrap_or(defaults.keyword_top_n),
            fallback_sentences: Self::get_env_parsed("FALLBACK_SENTENCES")
                .unwrap_or(defaults.fallback_sentences),
            chunk_concurrency: Self::get_env_parsed("CHUNK_CONCURRENCY")
                .unwrap_or(defaults.chunk_concurrency),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse a numeric environment variable, ignoring malformed values
    fn get_env_parsed<T: FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Get log file path
    pub fn get_log_path(&self, filename: &str) -> PathBuf {
        self.log_dir.join(filename)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocBriefError> {
        match self.llm_backend {
            LlmBackend::Ollama => {
                if !is_http_url(&self.ollama_base_url) {
                    return Err(DocBriefError::config(
                        "Ollama base URL must start with http:// or https://",
                    ));
                }
                if self.llm_model.trim().is_empty() {
                    return Err(DocBriefError::config("LLM model name cannot be empty"));
                }
            }
            LlmBackend::Gemini => {
                if self.gemini_api_key.is_none() {
                    return Err(DocBriefError::config(
                        "GEMINI_API_KEY is required when LLM_BACKEND=gemini",
                    ));
                }
                if !is_http_url(&self.gemini_base_url) {
                    return Err(DocBriefError::config(
                        "Gemini base URL must start with http:// or https://",
                    ));
                }
            }
        }

        if self.llm_timeout_secs == 0 {
            return Err(DocBriefError::config("LLM timeout cannot be 0"));
        }

        if self.chunk_max_chars == 0 || self.prompt_max_chars == 0 {
            return Err(DocBriefError::config("Character budgets must be greater than 0"));
        }

        if self.keyword_top_n == 0 {
            return Err(DocBriefError::config("Keyword count must be greater than 0"));
        }

        if self.server_port == 0 {
            return Err(DocBriefError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.llm_backend, LlmBackend::Ollama);
        assert_eq!(config.chunk_max_chars, 30_000);
        assert_eq!(config.keyword_top_n, 15);
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.ollama_base_url = "localhost:11434".to_string();
        assert!(invalid_config.validate().is_err());

        let mut zero_budget = AppConfig::default();
        zero_budget.chunk_max_chars = 0;
        assert!(zero_budget.validate().is_err());
    }

    #[test]
    fn test_gemini_requires_key() {
        let mut config = AppConfig::default();
        config.llm_backend = LlmBackend::Gemini;
        assert!(config.validate().is_err());

        config.gemini_api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Gemini".parse::<LlmBackend>().unwrap(), LlmBackend::Gemini);
        assert_eq!(" ollama ".parse::<LlmBackend>().unwrap(), LlmBackend::Ollama);
        assert!("openai".parse::<LlmBackend>().is_err());
    }
}
