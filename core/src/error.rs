//! Error types for the Intercom client.
//!
//! # Design
//! Transport failures and API-reported `errors` payloads are outcomes of the
//! remote exchange and live in [`crate::ApiResponse`]. `ClientError` covers
//! the local failures around it: a payload that cannot be serialized, a
//! response body that is not JSON, or unusable configuration.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced locally by `IntercomClient` and `ClientConfig`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A non-empty response body was not valid JSON.
    #[error("HTTP {status}: response body is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }
}
