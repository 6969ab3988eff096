//! Workspace archiving and publishing

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, Result};

/// Zip every file under `dir` into `<dir>.zip`, beside the directory.
///
/// Entries use only the file's base name. When two files in different
/// subdirectories share a name, the one walked last is kept.
pub fn zip_folder(dir: &Path) -> Result<PathBuf> {
    let zip_path = archive_path(dir);

    let result = write_archive(dir, &zip_path);
    if result.is_err() {
        let _ = std::fs::remove_file(&zip_path);
    }
    let count = result?;

    tracing::info!("Archived {} file(s) into {}", count, zip_path.display());
    Ok(zip_path)
}

/// `<dir>.zip` next to `dir`
pub fn archive_path(dir: &Path) -> PathBuf {
    let mut name = dir.as_os_str().to_owned();
    name.push(".zip");
    PathBuf::from(name)
}

/// Collect files by base name; later walk entries replace earlier ones.
fn flatten_files(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(previous) = files.insert(name, entry.into_path()) {
            tracing::debug!("Archive entry {} replaced", previous.display());
        }
    }
    Ok(files)
}

fn write_archive(dir: &Path, zip_path: &Path) -> Result<usize> {
    let files = flatten_files(dir)?;

    let mut zip = ZipWriter::new(BufWriter::new(File::create(zip_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in &files {
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(path)?;
        std::io::copy(&mut source, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(files.len())
}

/// Move a finished archive into the public download directory and return
/// its file name, which is also its public name.
pub fn publish_archive(archive: &Path, download_dir: &Path) -> Result<String> {
    let file_name = archive
        .file_name()
        .ok_or_else(|| {
            AppError::Internal(format!("archive has no file name: {}", archive.display()))
        })?
        .to_string_lossy()
        .into_owned();

    std::fs::create_dir_all(download_dir)?;
    let target = download_dir.join(&file_name);
    move_file(archive, &target)?;

    tracing::info!("Published {}", target.display());
    Ok(file_name)
}

/// Rename, falling back to copy and delete when the rename crosses
/// filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = std::fs::rename(from, to) {
        tracing::debug!("rename {} failed ({}), copying", from.display(), e);
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}
