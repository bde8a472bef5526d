//! Error types for QNS client operations.
//!
//! Every failure is surfaced to the immediate caller. The client never retries;
//! [`QnsError::is_transient`] exists so callers can layer their own policy.

use thiserror::Error;

/// Comprehensive error type for all QNS client operations
#[derive(Debug, Error)]
pub enum QnsError {
    /// Input rejected before any network call was made.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Client configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The signer could not produce authentication headers.
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    /// Connection, timeout or TLS failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success status.
    #[error("Service error ({status}): {code} - {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// A success response carried a body that is not a JSON object.
    #[error("Response decoding failed: {message}")]
    Decode { message: String },

    /// The payload could not be mapped onto the expected type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QnsError {
    /// Check if error is transient and the same request may succeed later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Configuration(_) => false,
            Self::Signing(_) => false,
            Self::Transport(e) => e.is_transient(),
            Self::Service { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } => false,
            Self::Json(_) => false,
        }
    }

    /// Service error code, if this is a service error response
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// HTTP status of a service error response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Configuration loading failed: {0}")]
    Loading(#[from] config::ConfigError),
}

/// Errors raised by a [`Signer`](crate::auth::Signer) implementation
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Signing operation failed: {message}")]
    SigningFailed { message: String },
}

/// Network-level failures, kept apart from service error responses
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    #[error("Connection failed: {message}")]
    Connect { message: String },

    #[error("Invalid request URL: {message}")]
    InvalidUrl { message: String },

    #[error("HTTP request failed: {message}")]
    Request { message: String },
}

impl TransportError {
    /// Timeouts and connection failures may clear up on their own
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connect { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
