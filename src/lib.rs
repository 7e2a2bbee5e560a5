pub mod error;
pub mod handlers;
pub mod models;
pub mod twitter;

use axum::{Router, routing::get};
use time::Duration;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use models::AppState;

/// Build the application router with its session layer.
///
/// The in-memory store is the default backend; any other `SessionStore`
/// implementation can be wired in here without touching the handlers.
/// `state.config.session_secret` must be at least 64 bytes (enforced by
/// `AppConfig::from_env`).
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_expiry = Expiry::OnInactivity(Duration::hours(24));
    // Lax so the provider's redirect carries the session cookie
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(session_expiry)
        .with_signed(Key::derive_from(state.config.session_secret.as_bytes()));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/callback", get(handlers::callback_handler))
        .layer(session_layer)
        .with_state(state)
}
