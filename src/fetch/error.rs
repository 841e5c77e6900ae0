//! Errors raised talking to the document API.

use std::time::Duration;

use thiserror::Error;

/// Failures of a single document API call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Non-success HTTP status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// 429 from the API
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    /// The API answered but reported an error in the body
    #[error("API error: {0}")]
    Api(String),

    #[error("All retries exhausted: {0}")]
    RetriesExhausted(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Connection(_) => true,
            FetchError::Timeout => true,
            FetchError::RateLimited { .. } => true,
            FetchError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-requested delay before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        if let FetchError::RateLimited { retry_after_ms } = self {
            Some(Duration::from_millis(*retry_after_ms))
        } else {
            None
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::Connection(e.to_string())
        }
    }
}
