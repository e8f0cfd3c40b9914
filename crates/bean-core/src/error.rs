//! # Gateway Error Types
//!
//! Typed error handling for the beanstream-rs gateway client.
//! All gateway operations return `Result<T, GatewayError>`.
//!
//! A declined transaction is NOT an error: a commit that reaches the
//! gateway and parses cleanly yields a response whose `approved()` is
//! false. Errors are reserved for bad configuration, bad input, and
//! transport or wire-format failures.

use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration errors (conflicting validation modes, missing secrets,
    /// unsupported hash algorithm)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed field data or an invalid field combination, caught before
    /// any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered with a non-200 status
    #[error("Gateway returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Gateway rejected the request outright (e.g. a missing hash value)
    #[error("Gateway rejected request: {0}")]
    Rejected(String),

    /// Response body did not match the expected wire format
    #[error("Malformed gateway response: {0}")]
    Format(String),
}

impl GatewayError {
    /// Returns true if the caller can fix the input and rebuild the
    /// transaction (as opposed to a setup or transport problem).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }

    /// Returns true for failures that occurred on or after the wire
    /// exchange, as opposed to being caught locally.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_)
                | GatewayError::Http { .. }
                | GatewayError::Rejected(_)
                | GatewayError::Format(_)
        )
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
