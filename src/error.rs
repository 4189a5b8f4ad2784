//! # Harness Error Types
//!
//! Errors raised by the harness itself. Per-check failures (transport errors,
//! rejected responses, faulting predicates) are never surfaced here; they are
//! recorded as outcomes in the [`RunReport`](crate::report::RunReport).

use thiserror::Error;

/// Harness operation result type
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("No checks supplied: a run requires at least one check")]
    EmptyCheckList,

    #[error("Invalid check: {0}")]
    InvalidCheck(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    /// Create an invalid check error
    pub fn invalid_check(message: impl Into<String>) -> Self {
        Self::InvalidCheck(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an error for an unrecognised enum name (suite, format, mode)
    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

impl From<config::ConfigError> for HarnessError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}
