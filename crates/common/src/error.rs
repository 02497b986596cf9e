/// DocBrief error types
#[derive(Debug, thiserror::Error)]
pub enum DocBriefError {
    /// LLM related error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Refinement action outside the supported set
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Context or role profile outside the supported set
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocBriefError {
    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create invalid action error
    pub fn invalid_action<S: Into<String>>(msg: S) -> Self {
        Self::InvalidAction(msg.into())
    }

    /// Create invalid profile error
    pub fn invalid_profile<S: Into<String>>(msg: S) -> Self {
        Self::InvalidProfile(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response mapping
impl DocBriefError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::InvalidAction(_) => 400,
            Self::InvalidProfile(_) => 400,
            Self::Json(_) => 400,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Llm(_) => 502,
            Self::Network(_) => 503,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Machine readable error code used in API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidAction(_) => "INVALID_ACTION",
            Self::InvalidProfile(_) => "INVALID_CONTEXT",
            Self::Json(_) => "INVALID_JSON",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Llm(_) => "GENERATION_FAILED",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Internal(_) | Self::Io(_) | Self::Other(_) => "PROCESSING_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DocBriefError::invalid_action("expand").status_code(), 400);
        assert_eq!(DocBriefError::invalid_profile("ceo").status_code(), 400);
        assert_eq!(DocBriefError::network("down").status_code(), 503);
        assert_eq!(DocBriefError::config("bad").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DocBriefError::invalid_action("x").code(), "INVALID_ACTION");
        assert_eq!(DocBriefError::invalid_input("x").code(), "INVALID_INPUT");
    }

    #[test]
    fn test_display() {
        let err = DocBriefError::invalid_action("expand");
        assert_eq!(err.to_string(), "Invalid action: expand");
    }
}
