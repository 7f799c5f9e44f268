//! Error types for acme.sh operator domain logic

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by server resolution, PEM handling and configuration
#[derive(Debug, Error)]
pub enum CoreError {
    /// ACME server identifier is neither a known keyword nor a valid directory URL
    #[error("Invalid ACME server '{server}': {reason}")]
    InvalidServer { server: String, reason: String },

    /// PEM bundle has unbalanced or undecodable certificate blocks
    #[error("Malformed PEM bundle: {0}")]
    MalformedPem(String),

    /// Configuration values are present but not acceptable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create an invalid server error
    pub fn invalid_server(server: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidServer {
            server: server.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed PEM error
    pub fn malformed_pem(message: impl Into<String>) -> Self {
        Self::MalformedPem(message.into())
    }

    /// Whether this error stems from operator-supplied configuration
    ///
    /// Such errors are not transient; retrying with the same input fails again.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidServer { .. } | Self::InvalidConfig(_) | Self::Config(_)
        )
    }
}
