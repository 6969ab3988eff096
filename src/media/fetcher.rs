//! Batch audio fetching into a per-job workspace

use std::path::Path;
use tempfile::TempDir;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extractor::{ExtractOptions, MediaExtractor};

const WORKSPACE_PREFIX: &str = "bundle-";

/// Uniquely named temporary directory owned by one download job.
///
/// The directory and its contents are removed when the workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace inside `parent`
    pub fn create(parent: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent)?;
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory name, unique among concurrent jobs
    pub fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Delete the workspace now, reporting any failure
    pub fn remove(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

/// Download the audio of every URL into a new workspace.
///
/// Each URL is attempted once. Failures are logged and skipped, so the
/// workspace holds at most one audio file per URL.
pub async fn fetch_audio(
    extractor: &dyn MediaExtractor,
    urls: &[String],
    work_dir: &Path,
    config: &ExtractorConfig,
) -> Result<Workspace> {
    let workspace = Workspace::create(work_dir)?;
    let options = ExtractOptions::audio_download(workspace.path(), config);

    tracing::info!("Job {}: fetching {} track(s)", workspace.name(), urls.len());

    let mut failed = 0usize;
    for url in urls {
        match extractor.extract_info(url, &options).await {
            Ok(info) => {
                let title = info.and_then(|i| i.title).unwrap_or_default();
                tracing::debug!("Fetched {} {}", url, title);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("Error downloading {}: {}", url, e);
            }
        }
    }

    if failed > 0 {
        tracing::warn!("{} of {} download(s) failed", failed, urls.len());
    }

    Ok(workspace)
}
