//! Errors returned by the control-plane client

use thiserror::Error;

/// Error from a single API request
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, truncated body)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns true if the request may succeed when simply repeated
    ///
    /// Every transport failure counts, including a connection dropped while
    /// the body was being read. Only a request that could not be built is
    /// permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Request(e) => !e.is_builder(),
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }
}
