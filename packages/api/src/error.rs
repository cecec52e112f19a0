//! Errors returned by backend operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (network, DNS, CORS, ...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth service rejected the request (bad credentials, unconfirmed email, ...).
    #[error("{message}")]
    Auth { status: u16, message: String },

    /// The data store answered with a non-success status.
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// A single-row lookup matched nothing.
    #[error("no matching row")]
    NoRows,

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("not signed in")]
    NotSignedIn,
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    /// Whether the failure came from the caller's credentials rather than the network.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. } | ApiError::NotSignedIn)
    }

    /// The auth service no longer recognises the session's token.
    pub fn is_rejected_token(&self) -> bool {
        matches!(self, ApiError::Auth { status: 401 | 403 | 404, .. })
    }
}
