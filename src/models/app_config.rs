use crate::twitter::TwitterClient;

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_secret: String,
    pub callback_url: String,
    pub session_secret: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        use dotenvy::dotenv;
        use std::env;

        dotenv().ok();

        let api_key = env::var("TWITTER_API_KEY")
            .map_err(|e| format!("TWITTER_API_KEY not found: {}", e))?;
        let api_secret = env::var("TWITTER_API_SECRET")
            .map_err(|e| format!("TWITTER_API_SECRET not found: {}", e))?;
        let callback_url =
            env::var("CALLBACK_URL").map_err(|e| format!("CALLBACK_URL not found: {}", e))?;
        let session_secret =
            env::var("SESSION_SECRET").map_err(|e| format!("SESSION_SECRET not found: {}", e))?;
        // the cookie signing key needs at least 64 bytes of material
        if session_secret.len() < 64 {
            return Err("SESSION_SECRET must be at least 64 bytes".to_string());
        }
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| format!("PORT is not a valid port number: {}", e))?,
            Err(_) => 3000,
        };

        Ok(Self {
            api_key,
            api_secret,
            callback_url,
            session_secret,
            port,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub twitter: TwitterClient,
}
