//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{DownloadsConfig, ExtractorConfig, RetentionConfig, ServerConfig};
use crate::error::{AppError, Result};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Extraction engine settings
    pub extractor: Option<ExtractorSettings>,
    /// Download directory settings
    pub downloads: Option<DownloadsSettings>,
    /// Archive retention settings
    pub retention: Option<RetentionSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Maximum request body size in MB
    pub max_request_size_mb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// yt-dlp executable
    pub binary: Option<String>,
    /// ffmpeg location passed through to yt-dlp
    pub ffmpeg_location: Option<PathBuf>,
    /// Target audio codec
    pub audio_format: Option<String>,
    /// Audio quality tier
    pub audio_quality: Option<String>,
    /// Extra yt-dlp arguments
    pub extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadsSettings {
    /// Public archive directory
    pub download_dir: Option<PathBuf>,
    /// Workspace parent directory
    pub work_dir: Option<PathBuf>,
    /// Reject download names that are not plain file names
    pub strict_filenames: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Maximum archive age in seconds
    pub max_age_secs: Option<u64>,
    /// Sweep interval in seconds
    pub sweep_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerSettings {
                host: defaults.host,
                port: defaults.port,
                cors_enabled: Some(defaults.cors_enabled),
                max_request_size_mb: Some(defaults.max_request_size_mb),
            },
            extractor: Some(ExtractorSettings {
                binary: Some(defaults.extractor.binary),
                ffmpeg_location: None,
                audio_format: Some(defaults.extractor.audio_format),
                audio_quality: Some(defaults.extractor.audio_quality),
                extra_args: Some(Vec::new()),
            }),
            downloads: Some(DownloadsSettings {
                download_dir: Some(defaults.downloads.download_dir),
                work_dir: None,
                strict_filenames: Some(defaults.downloads.strict_filenames),
            }),
            retention: Some(RetentionSettings {
                max_age_secs: None,
                sweep_interval_secs: Some(defaults.retention.sweep_interval_secs),
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to ServerConfig, filling unset values with defaults
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();

        let extractor = match self.extractor {
            Some(e) => ExtractorConfig {
                binary: e.binary.unwrap_or(defaults.extractor.binary),
                ffmpeg_location: e.ffmpeg_location,
                audio_format: e.audio_format.unwrap_or(defaults.extractor.audio_format),
                audio_quality: e.audio_quality.unwrap_or(defaults.extractor.audio_quality),
                extra_args: e.extra_args.unwrap_or_default(),
            },
            None => defaults.extractor,
        };

        let downloads = match self.downloads {
            Some(d) => DownloadsConfig {
                download_dir: d.download_dir.unwrap_or(defaults.downloads.download_dir),
                work_dir: d.work_dir.unwrap_or(defaults.downloads.work_dir),
                strict_filenames: d
                    .strict_filenames
                    .unwrap_or(defaults.downloads.strict_filenames),
            },
            None => defaults.downloads,
        };

        let retention = match self.retention {
            Some(r) => RetentionConfig {
                max_age_secs: r.max_age_secs,
                sweep_interval_secs: r
                    .sweep_interval_secs
                    .unwrap_or(defaults.retention.sweep_interval_secs),
            },
            None => defaults.retention,
        };

        let (log_level, log_format) = match self.logging {
            Some(l) => (l.level, l.format.unwrap_or(defaults.log_format)),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            extractor,
            downloads,
            retention,
            cors_enabled: self.server.cors_enabled.unwrap_or(defaults.cors_enabled),
            log_level,
            log_format,
            max_request_size_mb: self
                .server
                .max_request_size_mb
                .unwrap_or(defaults.max_request_size_mb),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}
