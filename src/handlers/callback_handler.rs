use axum::extract::{Query, State};
use axum::response::Html;
use tower_sessions::Session;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::models::AppState;
use crate::models::oauth::{CallbackParams, OAuthSessionData, SESSION_KEY};

/// Callback Handshake Handler: validate the returned token against the
/// session, exchange the verifier for access credentials, post once, then
/// tear the session down. Every failure is terminal for the request.
pub async fn callback_handler(
    Query(params): Query<CallbackParams>,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let stored: OAuthSessionData = session
        .get(SESSION_KEY)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to read handshake state from session");
            None
        })
        .unwrap_or_default();

    debug!(
        session_id = ?session.id(),
        oauth_token = ?params.oauth_token,
        "callback received"
    );

    let handshake = validate_callback(&params, &stored)?;

    let credentials = state
        .twitter
        .login(
            &handshake.request_token,
            &handshake.request_token_secret,
            &handshake.verifier,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "token exchange failed");
            AppError::provider("OAuth or tweet error", e)
        })?;

    let tweet = state
        .twitter
        .post_status(&credentials, "hi")
        .await
        .map_err(|e| {
            error!(error = %e, "tweet failed");
            AppError::provider("OAuth or tweet error", e)
        })?;

    // best-effort teardown; the handshake state is consumed either way
    if let Err(e) = session.flush().await {
        error!(error = %e, "session destroy error");
    }

    info!(tweet_id = %tweet.id, "tweet posted");

    Ok(Html(format!(
        r#"<html>
  <body>
    <h1>Success!</h1>
    <p>Tweet posted: <a href="https://x.com/i/status/{}" target="_blank">View on X</a></p>
  </body>
</html>"#,
        tweet.id
    )))
}

struct HandshakeInput {
    request_token: String,
    request_token_secret: String,
    verifier: String,
}

/// Steps 1 and 2 of the handshake state machine: all four values must be
/// present and non-empty, and the returned token must equal the stored one.
/// Runs before any network call.
fn validate_callback(
    params: &CallbackParams,
    stored: &OAuthSessionData,
) -> Result<HandshakeInput, AppError> {
    let token = params.oauth_token.as_deref().unwrap_or("");
    let verifier = params.oauth_verifier.as_deref().unwrap_or("");
    let stored_token = stored.request_token.as_deref().unwrap_or("");
    let stored_secret = stored.request_token_secret.as_deref().unwrap_or("");

    if token.is_empty() || verifier.is_empty() || stored_token.is_empty() || stored_secret.is_empty()
    {
        warn!(
            has_oauth_token = !token.is_empty(),
            has_oauth_verifier = !verifier.is_empty(),
            has_stored_token = !stored_token.is_empty(),
            has_stored_secret = !stored_secret.is_empty(),
            "missing OAuth callback parameters"
        );
        return Err(AppError::InvalidCallbackParams);
    }

    if token != stored_token {
        warn!(oauth_token = %token, stored_token = %stored_token, "OAuth token mismatch");
        return Err(AppError::TokenMismatch);
    }

    Ok(HandshakeInput {
        request_token: token.to_string(),
        request_token_secret: stored_secret.to_string(),
        verifier: verifier.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(token: Option<&str>, verifier: Option<&str>) -> CallbackParams {
        CallbackParams {
            oauth_token: token.map(str::to_string),
            oauth_verifier: verifier.map(str::to_string),
        }
    }

    fn stored(token: Option<&str>, secret: Option<&str>) -> OAuthSessionData {
        OAuthSessionData {
            request_token: token.map(str::to_string),
            request_token_secret: secret.map(str::to_string),
        }
    }

    #[test]
    fn accepts_matching_token_with_all_values_present() {
        let input = validate_callback(
            &params(Some("tok123"), Some("v1")),
            &stored(Some("tok123"), Some("sec456")),
        )
        .unwrap();

        assert_eq!(input.request_token, "tok123");
        assert_eq!(input.request_token_secret, "sec456");
        assert_eq!(input.verifier, "v1");
    }

    #[test]
    fn rejects_when_any_value_is_missing() {
        let full_stored = stored(Some("tok123"), Some("sec456"));

        let cases = [
            validate_callback(&params(None, Some("v1")), &full_stored),
            validate_callback(&params(Some("tok123"), None), &full_stored),
            validate_callback(
                &params(Some("tok123"), Some("v1")),
                &stored(None, Some("sec456")),
            ),
            validate_callback(
                &params(Some("tok123"), Some("v1")),
                &stored(Some("tok123"), None),
            ),
            validate_callback(&params(None, None), &stored(None, None)),
        ];

        for case in cases {
            assert!(matches!(case, Err(AppError::InvalidCallbackParams)));
        }
    }

    #[test]
    fn rejects_empty_strings_like_missing_values() {
        let result = validate_callback(
            &params(Some(""), Some("v1")),
            &stored(Some("tok123"), Some("sec456")),
        );
        assert!(matches!(result, Err(AppError::InvalidCallbackParams)));
    }

    #[test]
    fn rejects_token_mismatch() {
        let result = validate_callback(
            &params(Some("tokXXX"), Some("v1")),
            &stored(Some("tok123"), Some("sec456")),
        );
        assert!(matches!(result, Err(AppError::TokenMismatch)));
    }
}
