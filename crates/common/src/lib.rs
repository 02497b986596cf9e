pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::{AppConfig, LlmBackend};
pub use error::DocBriefError;
pub type Result<T> = std::result::Result<T, DocBriefError>;
