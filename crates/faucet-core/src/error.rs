//! Error types for calls to the OAuth provider and the faucet backend.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the outbound HTTP clients.
#[derive(Error, Debug)]
pub enum FaucetClientError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {endpoint}")]
    Status {
        endpoint: String,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// A configured URL could not be joined with an endpoint path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FaucetClientError {
    /// HTTP status of the failed call, when the remote answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Convenience type alias for client results.
pub type ClientResult<T> = std::result::Result<T, FaucetClientError>;
