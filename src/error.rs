//! Error handling module for admin-kit
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Module-level errors (`RequestError`, `RuleError`) convert into `AdminError`
//! so callers composing several utilities can use a single `Result`.

use thiserror::Error;

use crate::persistence::RequestError;
use crate::rules::RuleError;

/// Main error type for admin-kit
#[derive(Error, Debug)]
pub enum AdminError {
    /// IO errors (reading metadata, page or config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence package request construction errors
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Page rule errors
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Validation errors (request invariants, input values)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for admin-kit operations
pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
