//! Model-related error types.
//!
//! Everything in here is a transport-level failure from the caller's point
//! of view: the backend was unreachable, answered with an error status, or
//! answered with something that was not a chat completion at all. What the
//! completion *said* is judged elsewhere.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors from talking to the inference backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP error status from the API.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
        /// Response headers.
        headers: HashMap<String, String>,
    },

    /// API-level error with a decoded message.
    #[error("API error: {message}")]
    Api {
        /// Error message.
        message: String,
        /// Error code, when the API provides one.
        code: Option<String>,
    },

    /// Request exceeded its wall-clock budget.
    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    /// Rate limited by the API.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested retry delay from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backend answered, but not with a decodable chat completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Model not found on the backend.
    #[error("model not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection-level failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Whether a retry loop may reasonably re-issue the request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Timeout(_) => true,
            ModelError::RateLimited { .. } => true,
            ModelError::Connection(_) => true,
            ModelError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The retry-after duration, if the backend suggested one.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ModelError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: None,
        }
    }

    /// Create an API error with a code.
    pub fn api_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    /// Create a rate-limited error.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Timeout(Duration::from_secs(60))
        } else if err.is_connect() {
            ModelError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ModelError::Http {
                status: status.as_u16(),
                body: err.to_string(),
                headers: HashMap::new(),
            }
        } else {
            ModelError::Other(err.into())
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
