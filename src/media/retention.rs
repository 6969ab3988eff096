//! Archive retention
//!
//! Archives accumulate in the download directory. When a maximum age is
//! configured, a periodic sweep deletes the stale ones.

use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// Delete `*.zip` files in `dir` last modified more than `max_age` ago.
///
/// Returns the number of archives removed. A missing directory counts as
/// empty. Files that vanish or cannot be removed mid-sweep are logged and
/// skipped.
pub fn sweep_download_dir(dir: &Path, max_age: Duration) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "zip") {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age <= max_age {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed expired archive {}", path.display());
                removed += 1;
            }
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    Ok(removed)
}
