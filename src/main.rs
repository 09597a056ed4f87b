//! Main entry point for the cover art service

use cover_art_studio::{
    api,
    config::{LoggingConfig, Settings},
    generation::GenerationClient,
    storage::FileStore,
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenvy::dotenv().is_ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_logging(&settings.logging);
    info!(env_file = env_loaded, "Starting Cover Art Studio");
    info!(
        "Loaded configuration: server={}:{} model={}",
        settings.server.host, settings.server.port, settings.generation.model
    );

    // Fails here when no API key is configured
    let generator = GenerationClient::from_config(&settings.generation)?;

    let store = Arc::new(FileStore::open(&settings.storage.path));
    info!(path = ?store.path(), "Using state file");

    let app_state = Arc::new(AppState::new(generator, store));
    info!(entries = app_state.history.len(), "History loaded");

    // Build the router
    let app = api::create_router(app_state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
