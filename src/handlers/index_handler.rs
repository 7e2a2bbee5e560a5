use axum::extract::State;
use axum::response::Html;
use tower_sessions::Session;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::AppState;
use crate::models::oauth::{OAuthSessionData, SESSION_KEY};

/// Auth-Link Initiator: obtain a temporary token pair from the provider,
/// store it in the caller's session, render the sign-in link.
pub async fn index_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let link = state
        .twitter
        .generate_auth_link(&state.config.callback_url)
        .await
        .map_err(|e| {
            error!(error = %e, "error generating auth link");
            AppError::provider("Error generating auth link", e)
        })?;

    let session_data = OAuthSessionData {
        request_token: Some(link.oauth_token.clone()),
        request_token_secret: Some(link.oauth_token_secret.clone()),
    };
    // checked write: the rendered link must never reference a token that
    // was not persisted
    session.insert(SESSION_KEY, session_data).await?;
    session.save().await?;

    info!(
        session_id = ?session.id(),
        oauth_token = %link.oauth_token,
        "generated auth link"
    );

    Ok(Html(format!(
        r#"<html>
  <body>
    <h1>Simple Tweet App</h1>
    <p>Click to sign in with Twitter and post "hi"!</p>
    <a href="{}"><button style="padding:10px; font-size:16px;">Sign in with Twitter</button></a>
  </body>
</html>"#,
        link.url
    )))
}
