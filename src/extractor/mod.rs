//! Extraction engine interface
//!
//! This module defines the seam to the external metadata/download engine:
//! - `InfoDict`, the metadata structure the engine returns
//! - `ExtractOptions`, the options bag passed on every call
//! - `MediaExtractor`, the trait the rest of the server talks to
//! - `YtDlp`, the implementation that drives the yt-dlp executable

pub mod info;
pub mod options;
pub mod ytdlp;

pub use info::InfoDict;
pub use options::{ExtractOptions, PostProcessor};
pub use ytdlp::YtDlp;

use async_trait::async_trait;

use crate::error::Result;

/// A metadata extraction and media download engine.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Extract metadata for `url`, downloading media unless
    /// `options.skip_download` is set.
    ///
    /// `Ok(None)` means the engine produced no result for the URL.
    async fn extract_info(&self, url: &str, options: &ExtractOptions) -> Result<Option<InfoDict>>;

    /// Short engine name for logs and the version endpoint
    fn name(&self) -> &str;
}
