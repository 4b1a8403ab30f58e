use crate::error::{ReqSyncError, Result};
use std::path::{Path, PathBuf};

/// Canonical form of the scan root, which must be an existing directory.
pub fn scan_root(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let invalid = || {
        ReqSyncError::PathValidation(format!(
            "The argument {} is not a valid folder",
            path.display()
        ))
    };

    let canonical = path.canonicalize().map_err(|_| invalid())?;
    if !canonical.is_dir() {
        return Err(invalid());
    }
    Ok(canonical)
}

/// Resolves a file to write inside `repo_root` (already canonical).
///
/// Only the parent directory has to exist, so files missing from the
/// checked-out branch can still be created.
pub fn file_in_repository(file: &Path, repo_root: &Path) -> Result<PathBuf> {
    let (Some(parent), Some(name)) = (file.parent(), file.file_name()) else {
        return Err(ReqSyncError::PathValidation(format!(
            "'{}' does not name a file",
            file.display()
        )));
    };

    let parent = parent.canonicalize().map_err(|e| {
        ReqSyncError::PathValidation(format!("Invalid directory '{}': {e}", parent.display()))
    })?;
    if !parent.starts_with(repo_root) {
        return Err(ReqSyncError::PathValidation(format!(
            "'{}' is outside the repository {}",
            file.display(),
            repo_root.display()
        )));
    }

    Ok(parent.join(name))
}
