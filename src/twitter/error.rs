//! Provider error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwitterError {
    /// Network-level failure talking to the provider.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the provider, with whatever structured body it
    /// returned kept for diagnostic rendering.
    #[error("Twitter API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<serde_json::Value>,
    },

    /// Token endpoint returned a body missing the expected fields.
    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    /// Signing failed before the request was sent.
    #[error("OAuth signing failed: {0}")]
    Signature(String),

    /// The request URL could not be parsed for signing.
    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),
}

impl TwitterError {
    /// Structured detail from the provider, if any.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}
