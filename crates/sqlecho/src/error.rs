//! Error types for sqlecho

use thiserror::Error;

/// Result type alias for sqlecho operations
pub type EchoResult<T> = Result<T, EchoError>;

/// Errors raised inside the instrumentation layer.
///
/// Every variant is recovered locally by the gate and surfaces only as an
/// error-severity log record. Failures of the wrapped invocation itself are
/// the caller's generic error type and never pass through this enum.
#[derive(Debug, Error)]
pub enum EchoError {
    /// A placeholder value could not be resolved or rendered
    #[error("substitution failed for '{property}': {message}")]
    Substitution {
        property: String,
        message: String,
    },

    /// Dumping result contents failed
    #[error("result dump failed: {0}")]
    Summarize(String),
}

impl EchoError {
    /// Create a substitution error for a specific bound property
    pub fn substitution(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Substitution {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create a summarization error
    pub fn summarize(message: impl Into<String>) -> Self {
        Self::Summarize(message.into())
    }

    /// Check if this is a substitution error
    pub fn is_substitution(&self) -> bool {
        matches!(self, Self::Substitution { .. })
    }
}
