//! Playlist to MP3 bundle server
//!
//! A single-page web utility: submit a video or playlist URL, pick videos
//! from the listing, and download their audio as MP3 files in one ZIP.
//! Listing and downloading are delegated to yt-dlp (and its ffmpeg
//! post-processing); this server normalizes URLs, orchestrates the batch
//! and archives the results.

mod config;
mod config_file;
mod error;
mod extractor;
mod http;
mod media;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "tubebundle";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if first.as_deref() == Some("--generate-config") {
        let path = args.next().unwrap_or_else(|| "config.toml".to_string());
        crate::config_file::generate_default_config(&path)?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    // Load configuration
    let config_path = first.unwrap_or_else(|| "config.toml".to_string());
    let (config, load_error) = load_config(&config_path);

    // Initialize logging
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = load_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::info!("Configuration loaded: {:?}", config);

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));
    state.ensure_download_dir()?;
    tracing::info!(
        "Serving archives from {}",
        config.downloads.download_dir.display()
    );

    // Background task: delete expired archives.
    if let Some(max_age) = config.retention.max_age() {
        let download_dir = config.downloads.download_dir.clone();
        let period = config.retention.sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let dir = download_dir.clone();
                let result =
                    tokio::task::spawn_blocking(move || media::sweep_download_dir(&dir, max_age))
                        .await;
                match result {
                    Ok(Ok(removed)) if removed > 0 => {
                        tracing::info!("Removed {} expired archive(s)", removed)
                    }
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => tracing::warn!("Archive sweep failed: {}", e),
                    Err(e) => tracing::warn!("Archive sweep task failed: {}", e),
                }
            }
        });
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid listen address: {}", e)))?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the config file if present, otherwise defaults.
///
/// Load errors are returned alongside the defaults so they can be logged
/// once logging is up.
fn load_config(path: &str) -> (ServerConfig, Option<AppError>) {
    if !std::path::Path::new(path).exists() {
        return (ServerConfig::default(), None);
    }
    match crate::config_file::ConfigFile::from_file(path) {
        Ok(cf) => (cf.into_server_config(), None),
        Err(e) => (ServerConfig::default(), Some(e)),
    }
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("tubebundle={},tower_http=debug", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
