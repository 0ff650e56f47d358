mod config;
mod error;
mod handlers;
mod recommend;
mod sentiment;
mod spotify;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::handlers::router;
use crate::recommend::Recommender;
use crate::sentiment::VaderScorer;
use crate::spotify::SpotifyClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let spotify = SpotifyClient::new(
        config.spotify_client_id,
        config.spotify_client_secret,
        config.spotify_timeout,
    )
    .map_err(anyhow::Error::msg)?;

    if config.startup_check {
        match spotify.verify_credentials().await {
            Ok(()) => tracing::info!("spotify credentials verified"),
            Err(e) => tracing::warn!("spotify credential check failed: {}", e),
        }
    }

    let recommender = Recommender::new(Arc::new(spotify), Arc::new(VaderScorer::new()));

    let app = router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(recommender);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
