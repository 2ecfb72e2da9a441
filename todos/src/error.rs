//! Error types for the todos client

use thiserror::Error;

/// Errors returned by a [`crate::api::TodoApi`] implementation
///
/// Every variant is treated the same way by the reducer: the call was
/// rejected. The distinction only matters for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The resource answered with a non-2xx status
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The in-memory backend was told to reject this call
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Errors raised while reading configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Environment variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}
