//! Twitter client: the three-legged OAuth 1.0a handshake plus a single
//! v2 write call. Nothing here retries; every call is one-shot.

use std::collections::{BTreeMap, HashMap};

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::TwitterError;
use super::oauth::{self, Token};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    consumer_key: String,
    consumer_secret: String,
    base_url: String,
}

/// Result of the temporary-credential request: the token pair to stash in
/// the session and the URL the user is sent to for authorization.
#[derive(Debug, Clone)]
pub struct AuthLink {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub url: String,
}

/// Access credentials obtained from the verifier exchange. Used once, never
/// persisted.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub access_token: String,
    pub access_token_secret: String,
    pub user_id: Option<String>,
    pub screen_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

/// The created status, as returned by `POST /2/tweets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    pub text: String,
}

impl TwitterClient {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host. Used by tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Step 1: obtain a temporary token pair scoped to `callback_url` with a
    /// read-write access-level request, and build the authorization URL.
    pub async fn generate_auth_link(&self, callback_url: &str) -> Result<AuthLink, TwitterError> {
        let url = format!("{}/oauth/request_token?x_auth_access_type=write", self.base_url);

        let mut extra = BTreeMap::new();
        extra.insert("oauth_callback", callback_url);
        let header = oauth::authorization_header(
            &self.consumer_key,
            &self.consumer_secret,
            Token::default(),
            "POST",
            &url,
            &extra,
        )?;

        let response = self.http.post(&url).header("Authorization", header).send().await?;
        let body = read_success_body(response).await?;
        let fields = parse_token_body(&body)?;

        let oauth_token = require_field(&fields, "oauth_token")?;
        let oauth_token_secret = require_field(&fields, "oauth_token_secret")?;
        if fields.get("oauth_callback_confirmed").map(String::as_str) != Some("true") {
            warn!("provider did not confirm the callback URL");
        }

        let authorize_url = format!(
            "{}/oauth/authorize?oauth_token={}",
            self.base_url,
            oauth::percent_encode(&oauth_token)
        );
        debug!(%oauth_token, "obtained request token");

        Ok(AuthLink {
            oauth_token,
            oauth_token_secret,
            url: authorize_url,
        })
    }

    /// Step 3: exchange the request token and verifier for access
    /// credentials. The verifier travels in the Authorization header, so it
    /// enters the signature exactly once.
    pub async fn login(
        &self,
        request_token: &str,
        request_token_secret: &str,
        verifier: &str,
    ) -> Result<UserCredentials, TwitterError> {
        let url = format!("{}/oauth/access_token", self.base_url);

        let mut extra = BTreeMap::new();
        extra.insert("oauth_verifier", verifier);
        let header = oauth::authorization_header(
            &self.consumer_key,
            &self.consumer_secret,
            Token::new(request_token, request_token_secret),
            "POST",
            &url,
            &extra,
        )?;

        let response = self.http.post(&url).header("Authorization", header).send().await?;
        let body = read_success_body(response).await?;
        let fields = parse_token_body(&body)?;

        Ok(UserCredentials {
            access_token: require_field(&fields, "oauth_token")?,
            access_token_secret: require_field(&fields, "oauth_token_secret")?,
            user_id: fields.get("user_id").cloned(),
            screen_name: fields.get("screen_name").cloned(),
        })
    }

    /// Post one status update on behalf of the authorizing user.
    pub async fn post_status(
        &self,
        credentials: &UserCredentials,
        text: &str,
    ) -> Result<CreatedTweet, TwitterError> {
        let url = format!("{}/2/tweets", self.base_url);

        let header = oauth::authorization_header(
            &self.consumer_key,
            &self.consumer_secret,
            Token::new(&credentials.access_token, &credentials.access_token_secret),
            "POST",
            &url,
            &BTreeMap::new(),
        )?;

        let response = self
            .http
            .post(&url)
            .header("Authorization", header)
            .json(&CreateTweetRequest { text })
            .send()
            .await?;
        let body = read_success_body(response).await?;

        let parsed: CreateTweetResponse = serde_json::from_str(&body)
            .map_err(|e| TwitterError::InvalidTokenResponse(e.to_string()))?;
        debug!(tweet_id = %parsed.data.id, "status posted");
        Ok(parsed.data)
    }
}

/// Read the body, turning any non-2xx status into an `Api` error that keeps
/// the provider's structured detail when the body is JSON.
async fn read_success_body(response: Response) -> Result<String, TwitterError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let detail = serde_json::from_str::<serde_json::Value>(&body).ok();
    let message = detail
        .as_ref()
        .and_then(api_message)
        .unwrap_or_else(|| body.trim().to_string());

    Err(TwitterError::Api {
        status: status.as_u16(),
        message,
        detail,
    })
}

fn api_message(detail: &serde_json::Value) -> Option<String> {
    detail
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .or_else(|| detail.get("title").and_then(serde_json::Value::as_str))
        .or_else(|| detail.pointer("/errors/0/message").and_then(serde_json::Value::as_str))
        .map(str::to_owned)
}

/// Token endpoints answer with form-encoded bodies.
fn parse_token_body(body: &str) -> Result<HashMap<String, String>, TwitterError> {
    serde_urlencoded::from_str(body).map_err(|e| TwitterError::InvalidTokenResponse(e.to_string()))
}

fn require_field(fields: &HashMap<String, String>, name: &str) -> Result<String, TwitterError> {
    fields
        .get(name)
        .cloned()
        .ok_or_else(|| TwitterError::InvalidTokenResponse(format!("missing {name}")))
}
