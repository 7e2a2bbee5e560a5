//! Request-level error taxonomy.
//!
//! Validation failures are terminal 400s with a plain message; provider
//! failures are 500s carrying the provider's message and structured detail;
//! session-store failures are 500s. Nothing here is retried.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::twitter::TwitterError;

#[derive(Debug, Error)]
pub enum AppError {
    /// One of the four required handshake values is missing or empty.
    #[error("Invalid OAuth callback parameters")]
    InvalidCallbackParams,

    /// The returned token does not match the one stored for this session.
    #[error("OAuth token mismatch")]
    TokenMismatch,

    /// The provider rejected a call (request token, exchange, or post).
    #[error("{context}: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: TwitterError,
    },

    /// The session store failed a checked write.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    pub fn provider(context: &'static str, source: TwitterError) -> Self {
        Self::Provider { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::InvalidCallbackParams | Self::TokenMismatch => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::Provider { source, .. } => {
                let detail = source
                    .detail()
                    .and_then(|value| serde_json::to_string_pretty(value).ok())
                    .unwrap_or_else(|| "{}".to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!("{self}<br><pre>{detail}</pre>")),
                )
                    .into_response()
            }
            Self::Session(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
