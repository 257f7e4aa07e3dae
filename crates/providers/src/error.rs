//! Model API error types.

use thiserror::Error;

/// Failure from the hosted model API: bad key, exhausted quota, or plain
/// network trouble. Every variant is terminal for the request that raised it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("model API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for authentication/authorization failures (bad or missing key).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Api { status: 401 | 403, .. })
    }

    /// True when the service reported quota or rate-limit exhaustion.
    pub fn is_quota(&self) -> bool {
        matches!(self, ApiError::Api { status: 429, .. })
    }
}
