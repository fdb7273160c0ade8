use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{self, Error, Result};

/// Files directly under `dir` whose name ends with `suffix`, sorted by name.
///
/// Symlinks count as files when their target is one.
pub(super) fn list_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir).map_err(|e| Error::file_read(dir, e))? {
        let entry = entry.map_err(|e| Error::file_read(dir, e))?;
        if !entry.file_name().to_string_lossy().ends_with(suffix) {
            continue;
        }
        let path = entry.path();
        let is_file = std::fs::metadata(&path)
            .map_err(|e| Error::file_read(&path, e))?
            .is_file();
        if is_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copies matching files from `source_dir` into `target_dir`, byte for byte.
///
/// A missing `source_dir` is not an error; nothing is copied and `target_dir`
/// is left uncreated. Returns the written paths.
pub(super) fn copy_assets(
    source_dir: &Path,
    target_dir: &Path,
    suffix: &str,
) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        info!("Asset directory({source_dir:?}) does not exist. ignoring...");
        return Ok(vec![]);
    }
    error::create_dir_all(target_dir)?;

    let mut copied = vec![];
    for source in list_files(source_dir, suffix)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = target_dir.join(name);
        debug!("Copying {source:?} to {target:?}");
        let bytes = std::fs::read(&source).map_err(|e| Error::file_read(&source, e))?;
        error::write(&target, bytes)?;
        copied.push(target);
    }
    Ok(copied)
}
