//! Server error types.

use calendar_mcp_core::TracingError;
use calendar_mcp_providers::ProviderError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or running.
///
/// Failures while reading a resource never become a `ServerError`: the
/// resource layer turns them into a degraded envelope.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Logging could not be set up.
    #[error("Tracing error: {0}")]
    Tracing(#[from] TracingError),

    /// The calendar gateway could not be constructed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The MCP transport failed to start or stopped abnormally.
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
