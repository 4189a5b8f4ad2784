//! # Client Error Types
//!
//! Failure causes reported by an [`RpcClient`](super::RpcClient) invocation.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failure causes for a single remote invocation
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unknown operation: {operation}")]
    UnknownOperation { operation: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout waiting for operation: {operation} ({timeout_ms}ms)")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Server fault: {code} - {message}")]
    ServerFault { code: u16, message: String },

    #[error("JSON serialization/deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an unknown operation error
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Create a not-found error for a named resource
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a server fault error
    pub fn server_fault(code: u16, message: impl Into<String>) -> Self {
        Self::ServerFault {
            code,
            message: message.into(),
        }
    }

    /// Check if error is recoverable (worth retrying)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Timeout { .. } => true,
            ClientError::ServerFault { code, .. } => *code >= 500,
            _ => false,
        }
    }
}
