use anyhow::Context;
use livestream_overlays::config::Config;
use livestream_overlays::server::build_router;
use livestream_overlays::store::MongoOverlayStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livestream_overlays=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}",
        config.host, config.port
    );
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let mongo_uri = config.mongo_uri()?;
    let store = MongoOverlayStore::connect(mongo_uri)
        .await
        .context("Failed to connect to MongoDB")?;

    let app = build_router(Arc::new(store), &config.cors);

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Livestream overlay API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
