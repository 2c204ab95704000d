//! GeoSearch-RS: charging-station and point-of-interest search gateway
//!
//! This is the main entry point for the application.

use anyhow::Result;
use geosearch_rs::{
    config::{self, Settings},
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so the debug flag can pick the level
    let (settings, source) = load_settings()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting GeoSearch-RS v{}", geosearch_rs::VERSION);
    info!("Loaded configuration from {}", source);

    if settings.provider.api_key.is_none() {
        warn!("TOMTOM_API_KEY is not set; search endpoints will return configuration errors");
    }

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    config::init(settings.clone())?;

    // Create application state
    let state = AppState::new(settings.clone(), client);
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Load settings from file or use defaults
fn load_settings() -> Result<(Settings, String)> {
    // Check environment variable first
    if let Ok(path) = std::env::var("GEOSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok((settings, path.display().to_string()));
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/geosearch/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("geosearch-rs/settings.yml"));
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok((settings, path.display().to_string()));
        }
    }

    // Use defaults
    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, "defaults".to_string()))
}
