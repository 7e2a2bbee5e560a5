use serde::{Deserialize, Serialize};

/// Session key under which the handshake state lives.
pub const SESSION_KEY: &str = "oauth_data";

/// Temporary-credential state persisted between the two handshake legs,
/// scoped to one browser session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthSessionData {
    pub request_token: Option<String>,
    pub request_token_secret: Option<String>,
}

/// Query parameters the provider appends when redirecting back. Both are
/// optional so a bare callback reaches the presence check instead of being
/// rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
}
