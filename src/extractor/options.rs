//! Extraction options bag

use std::path::{Path, PathBuf};

use crate::config::ExtractorConfig;

/// Post-processing step applied after a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Extract the audio track and transcode it
    ExtractAudio { codec: String, quality: String },
}

/// Options passed to the engine on each call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// List playlist members without resolving each one
    pub flat_playlist: bool,
    /// Only fetch metadata
    pub skip_download: bool,
    /// Keep going when individual playlist entries fail
    pub ignore_errors: bool,
    /// Output path template, e.g. `<dir>/%(title)s.%(ext)s`
    pub output_template: Option<PathBuf>,
    /// Format selector
    pub format: Option<String>,
    pub postprocessors: Vec<PostProcessor>,
}

impl ExtractOptions {
    /// Options for a flattened, download-free listing
    pub fn listing() -> Self {
        Self {
            flat_playlist: true,
            skip_download: true,
            ignore_errors: true,
            ..Default::default()
        }
    }

    /// Options for downloading best audio into `dir`, named by title
    pub fn audio_download(dir: &Path, config: &ExtractorConfig) -> Self {
        Self {
            flat_playlist: false,
            skip_download: false,
            ignore_errors: true,
            output_template: Some(dir.join("%(title)s.%(ext)s")),
            format: Some("bestaudio/best".to_string()),
            postprocessors: vec![PostProcessor::ExtractAudio {
                codec: config.audio_format.clone(),
                quality: config.audio_quality.clone(),
            }],
        }
    }
}
