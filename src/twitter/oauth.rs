//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;

use super::error::TwitterError;

/// Token pair participating in a signature. Empty for the initial
/// temporary-credential request; afterwards it is either the request token
/// or the access token obtained from the exchange.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Token<'a> {
    pub token: Option<&'a str>,
    pub secret: Option<&'a str>,
}

impl<'a> Token<'a> {
    pub(crate) fn new(token: &'a str, secret: &'a str) -> Self {
        Self {
            token: Some(token),
            secret: Some(secret),
        }
    }
}

/// Build the `Authorization: OAuth ...` header for a single request.
///
/// `extra` holds additional `oauth_*` protocol parameters such as
/// `oauth_callback` or `oauth_verifier`. Query parameters of `url` are folded
/// into the signature; request bodies are not (this client only ever sends
/// JSON bodies, which RFC 5849 excludes from signing).
pub(crate) fn authorization_header(
    consumer_key: &str,
    consumer_secret: &str,
    token: Token<'_>,
    method: &str,
    url: &str,
    extra: &BTreeMap<&str, &str>,
) -> Result<String, TwitterError> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string());

    let mut params: BTreeMap<String, String> = BTreeMap::new();
    params.insert("oauth_consumer_key".into(), consumer_key.into());
    params.insert("oauth_nonce".into(), nonce());
    params.insert("oauth_signature_method".into(), "HMAC-SHA1".into());
    params.insert("oauth_timestamp".into(), timestamp);
    params.insert("oauth_version".into(), "1.0".into());
    if let Some(t) = token.token {
        params.insert("oauth_token".into(), t.into());
    }
    for (k, v) in extra {
        params.insert((*k).into(), (*v).into());
    }

    let base = signature_base(method, url, &params)?;
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token.secret.unwrap_or(""))
    );
    let signature = hmac_sha1(&signing_key, &base)?;
    params.insert("oauth_signature".into(), signature);

    let header = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {header}"))
}

/// Signature base string: uppercased method, the request URL stripped of its
/// query, and the sorted parameter string (oauth params + query pairs), each
/// segment percent-encoded.
fn signature_base(
    method: &str,
    url: &str,
    oauth_params: &BTreeMap<String, String>,
) -> Result<String, TwitterError> {
    let parsed = Url::parse(url)?;
    let base_url = format!(
        "{}://{}{}",
        parsed.scheme(),
        parsed.host_str().unwrap_or(""),
        parsed.path()
    );

    let mut all: BTreeMap<String, String> = oauth_params.clone();
    for (k, v) in parsed.query_pairs() {
        all.insert(k.into_owned(), v.into_owned());
    }

    let param_string = all
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&param_string)
    ))
}

fn hmac_sha1(key: &str, input: &str) -> Result<String, TwitterError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| TwitterError::Signature(e.to_string()))?;
    mac.update(input.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn nonce() -> String {
    let bytes: Vec<u8> = (0..32).map(|_| rand::random()).collect();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Percent-encode per RFC 3986 (unreserved characters pass through).
pub(crate) fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encode_rfc3986() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
        assert_eq!(percent_encode("ok-_.~"), "ok-_.~");
    }

    #[test]
    fn signature_base_sorts_and_folds_query() {
        let mut params = BTreeMap::new();
        params.insert("a".to_string(), "1".to_string());
        let base = signature_base("post", "http://example.com/path?b=2", &params).unwrap();
        assert_eq!(base, "POST&http%3A%2F%2Fexample.com%2Fpath&a%3D1%26b%3D2");
    }

    #[test]
    fn header_carries_oauth_params_but_not_secrets() {
        let mut extra = BTreeMap::new();
        extra.insert("oauth_callback", "https://localhost:3000/callback");

        let header = authorization_header(
            "ckey",
            "csecret",
            Token::new("tok", "tsecret"),
            "POST",
            "https://api.twitter.com/oauth/request_token?x_auth_access_type=write",
            &extra,
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"ckey\""));
        assert!(header.contains("oauth_token=\"tok\""));
        assert!(header.contains("oauth_callback="));
        assert!(header.contains("oauth_signature="));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(!header.contains("csecret"));
        assert!(!header.contains("tsecret"));
        // query params are signed but never emitted into the header
        assert!(!header.contains("x_auth_access_type"));
    }

    #[test]
    fn signature_depends_on_token_secret() {
        let params: BTreeMap<String, String> = BTreeMap::new();
        let base = signature_base("POST", "https://api.twitter.com/2/tweets", &params).unwrap();
        let a = hmac_sha1("csecret&one", &base).unwrap();
        let b = hmac_sha1("csecret&two", &base).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, hmac_sha1("csecret&one", &base).unwrap());
    }
}
