use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use portfolio_content::cache::{CachePolicy, ResponseCache};
use portfolio_content::config::Config;
use portfolio_content::delivery::ContentDelivery;
use portfolio_content::server::{self, AppState};
use portfolio_content::source::InMemorySource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_content=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting content service ({}, languages: {}, default: {})",
        config.environment,
        config.supported_languages.join(","),
        config.default_language
    );
    if !config.cache_enabled() {
        info!("Response caching is disabled in development");
    }

    let registry = Arc::new(config.language_registry()?);
    let source = InMemorySource::from_json_file(&config.content_seed_file, &registry)
        .with_context(|| format!("Failed to load content from {}", config.content_seed_file))?;
    let cache = Arc::new(ResponseCache::new(CachePolicy::from(&config)));
    let delivery = Arc::new(ContentDelivery::new(Arc::new(source), registry, cache));

    let app = server::router(AppState {
        delivery,
        environment: config.environment,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
