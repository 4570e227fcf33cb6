//! Decoded outcome of one API call.

use serde_json::Value;

use crate::http::TransportError;

/// What came back from the remote exchange.
///
/// The API reports its own failures inside a delivered response under an
/// `errors` key; those land in `ApiError` so they cannot be mistaken for
/// data. `TransportError` carries the transport's description verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Success(Value),
    ApiError(Value),
    TransportError(String),
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// The success value, if any.
    pub fn success(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<Value> {
        match self {
            ApiResponse::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The API's `errors` payload, if any.
    pub fn api_error(&self) -> Option<&Value> {
        match self {
            ApiResponse::ApiError(errors) => Some(errors),
            _ => None,
        }
    }

    /// Convert into a `Result`, folding both failure kinds into
    /// [`ResponseError`].
    pub fn into_result(self) -> Result<Value, ResponseError> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::ApiError(errors) => Err(ResponseError::Api(errors)),
            ApiResponse::TransportError(msg) => Err(ResponseError::Transport(msg)),
        }
    }
}

impl From<TransportError> for ApiResponse {
    fn from(err: TransportError) -> Self {
        ApiResponse::TransportError(err.0)
    }
}

/// Failure side of [`ApiResponse::into_result`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseError {
    #[error("API error: {0}")]
    Api(Value),
    #[error("transport error: {0}")]
    Transport(String),
}
