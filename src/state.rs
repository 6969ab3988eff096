//! Application state management
//!
//! The state is read-only after startup: configuration plus the extraction
//! engine handle. The only thing shared between requests at runtime is the
//! download directory on disk.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::extractor::{MediaExtractor, YtDlp};

/// Application state shared across all handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Extraction engine
    pub extractor: Arc<dyn MediaExtractor>,
}

impl AppState {
    /// Create a new AppState backed by yt-dlp
    pub fn new(config: ServerConfig) -> Self {
        let extractor = Arc::new(YtDlp::new(config.extractor.clone()));
        Self::with_extractor(config, extractor)
    }

    /// Create an AppState with a specific engine
    pub fn with_extractor(config: ServerConfig, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { config, extractor }
    }

    /// Make sure the public download directory exists
    pub fn ensure_download_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config.downloads.download_dir)
    }
}
