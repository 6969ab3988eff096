//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Extraction engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Path or name of the yt-dlp executable
    pub binary: String,

    /// Directory or binary path handed to yt-dlp as `--ffmpeg-location`
    pub ffmpeg_location: Option<PathBuf>,

    /// Target audio codec for the extract-audio post-processor
    pub audio_format: String,

    /// Audio quality tier (kbps when above 10, VBR level otherwise)
    pub audio_quality: String,

    /// Extra arguments appended to every invocation
    pub extra_args: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            ffmpeg_location: None,
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Download and workspace directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadsConfig {
    /// Public directory finished archives are moved into
    pub download_dir: PathBuf,

    /// Parent directory for per-job workspaces
    pub work_dir: PathBuf,

    /// Only serve plain file names from the download directory
    pub strict_filenames: bool,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            work_dir: std::env::temp_dir(),
            strict_filenames: true,
        }
    }
}

/// Archive retention policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Delete archives older than this many seconds. `None` keeps them forever.
    pub max_age_secs: Option<u64>,

    /// How often the sweeper runs
    pub sweep_interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_secs: None,
            sweep_interval_secs: 3600,
        }
    }
}

impl RetentionConfig {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Extraction engine configuration
    pub extractor: ExtractorConfig,

    /// Download directories
    pub downloads: DownloadsConfig,

    /// Archive retention
    pub retention: RetentionConfig,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,

    /// Maximum request body size in megabytes
    pub max_request_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            extractor: ExtractorConfig::default(),
            downloads: DownloadsConfig::default(),
            retention: RetentionConfig::default(),
            cors_enabled: false,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            max_request_size_mb: 1,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get maximum request body size in bytes
    pub fn max_request_bytes(&self) -> usize {
        self.max_request_size_mb * 1024 * 1024
    }
}
