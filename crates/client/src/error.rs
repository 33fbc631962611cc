//! Remote API error model.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure talking to the remote catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("network error: {0}")]
    Network(String),
    /// HTTP 404.
    #[error("resource not found")]
    NotFound,
    /// Any other non-success status.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    /// The body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}
