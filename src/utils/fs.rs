//! File system operations for installing extracted server files.
//!
//! [`move_tree`] merges an extracted directory into the installation directory;
//! [`remove_dir_all`] removes the scratch directory afterwards.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::UpdaterError;

/// Moves every file under `src` to the same relative path under `dst`.
///
/// Existing destination files are overwritten and missing directories are
/// created. Files are renamed where possible and copied then deleted when the
/// rename crosses file systems. Source directories are left behind (empty) for
/// the caller to remove.
///
/// Returns the destination paths of the moved files in walk order.
///
/// # Errors
///
/// [`UpdaterError::FileSystemError`] on the first I/O failure. Files moved
/// before the failure stay moved.
///
/// # Examples
///
/// ```rust,no_run
/// use mta_server_updater::utils::fs::move_tree;
/// use std::path::Path;
///
/// # fn example() -> Result<(), mta_server_updater::core::UpdaterError> {
/// let moved = move_tree(Path::new("tmp/server"), Path::new("."))?;
/// println!("installed {} files", moved.len());
/// # Ok(())
/// # }
/// ```
pub fn move_tree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, UpdaterError> {
    let mut moved = Vec::new();

    // min_depth(1) skips `src` itself; `dst` is created below if needed
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let error = e.into_io_error().unwrap_or_else(|| io::Error::other("walk error"));
            UpdaterError::file_system("read directory", &path, &error)
        })?;

        let relative = entry.path().strip_prefix(src).map_err(|_| UpdaterError::FileSystemError {
            operation: "resolve path".to_string(),
            path: entry.path().display().to_string(),
            reason: format!("not inside {}", src.display()),
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        move_file(entry.path(), &target)?;
        trace!("Moved {} -> {}", entry.path().display(), target.display());
        moved.push(target);
    }

    debug!("Moved {} files from {} to {}", moved.len(), src.display(), dst.display());
    Ok(moved)
}

/// Moves a single file, replacing `dst` if it exists.
pub fn move_file(src: &Path, dst: &Path) -> Result<(), UpdaterError> {
    if dst.is_file() {
        fs::remove_file(dst).map_err(|e| UpdaterError::file_system("replace file", dst, &e))?;
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(src, dst).map_err(|e| UpdaterError::file_system("copy file", dst, &e))?;
            fs::remove_file(src).map_err(|e| UpdaterError::file_system("remove file", src, &e))
        }
        Err(e) => Err(UpdaterError::file_system("move file", src, &e)),
    }
}

/// Creates `path` and its parents if they do not exist.
pub fn ensure_dir(path: &Path) -> Result<(), UpdaterError> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| UpdaterError::file_system("create directory", path, &e))
}

/// Recursively removes a directory and all its contents.
///
/// A missing directory is an error, not a no-op.
pub fn remove_dir_all(path: &Path) -> Result<(), UpdaterError> {
    fs::remove_dir_all(path).map_err(|e| UpdaterError::file_system("remove directory", path, &e))
}
