//! Error handling for the skill matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillMatcherError>;

impl SkillMatcherError {
    /// True when the error is the caller's fault rather than an
    /// infrastructure failure, so API layers can map status codes.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, SkillMatcherError::InvalidInput(_))
    }
}
