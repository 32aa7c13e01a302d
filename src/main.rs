use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use garden_press::config::Config;
use garden_press::server::{build_router, AppState};
use garden_press::store::ContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garden_press=info".parse()?),
        )
        .init();

    info!("Starting garden press server");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Open the content store
    let store = ContentStore::open(&config.content_dir)
        .with_context(|| format!("Failed to open content root '{}'", config.content_dir))?;

    // Assemble shared state and routes
    let state = Arc::new(AppState::new(&config, store)?);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        addr = addr.as_str(),
        environment = config.environment.as_str(),
        "Listening"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
