//! Twitter collaborator: OAuth 1.0a signing and the three provider calls
//! used by the handshake (request token, access token, create tweet).

mod client;
mod error;
mod oauth;

pub use client::{AuthLink, CreatedTweet, TwitterClient, UserCredentials};
pub use error::TwitterError;
