//! Error handling for the faucet frontend.

use axum::{http::StatusCode, response::IntoResponse, Json};
use faucet_core::FaucetClientError;
use serde_json::json;
use thiserror::Error;

/// Faucet frontend error types
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] FaucetClientError),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match &self {
            FrontendError::Upstream(_) | FrontendError::Proxy(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream service unavailable".to_string())
            }
            FrontendError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        tracing::error!("Request failed: {}", self);

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Result type alias for frontend operations
pub type FrontendResult<T> = Result<T, FrontendError>;
