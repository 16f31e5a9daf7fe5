//! Error type for the fallible edges of the transform engine
//!
//! Resolution misses (missing span, missing attribute, `null`) are not
//! errors and never reach this type; they take the fallback path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    /// Payload is not valid JSON or does not match the expected shape
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Payload is JSON but not a transform definition
    #[error("Invalid transform definition: {0}")]
    InvalidDefinition(String),

    /// Definition parsed but failed structural validation
    #[error("Transform failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// User-entered fallback text is not valid JSON
    #[error("Invalid fallback value: {0}")]
    InvalidFallback(String),
}

impl TransformError {
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition(reason.into())
    }

    /// Validation messages, empty for every other variant
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}
