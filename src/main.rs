use simple_tweet_server::app;
use simple_tweet_server::models::{AppConfig, AppState};
use simple_tweet_server::twitter::TwitterClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("simple_tweet_server=debug,info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let twitter = TwitterClient::new(config.api_key.clone(), config.api_secret.clone());
    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState { config, twitter };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
