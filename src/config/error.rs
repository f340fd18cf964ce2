//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one main question is required")]
    NoQuestions,

    #[error("Questions cannot be blank")]
    BlankQuestion,

    #[error("{field} exceeds maximum allowed ({max})")]
    FollowupCapTooLarge { field: &'static str, max: u32 },

    #[error("Text cannot be blank: {0}")]
    BlankText(&'static str),

    #[error("Tag '{tag}' cannot force action '{action}'")]
    UnsupportedTagAction { tag: String, action: String },

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
