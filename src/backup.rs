//! Template backups.

use crate::error::Result;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// What happened when a backup was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// The template was copied to this path
    Created(PathBuf),
    /// A backup was already there and was kept
    AlreadyExists(PathBuf),
}

impl BackupOutcome {
    pub fn path(&self) -> &Path {
        match self {
            BackupOutcome::Created(path) | BackupOutcome::AlreadyExists(path) => path,
        }
    }
}

/// `<input>.bak`, keeping the original extension.
pub fn backup_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy `input` to its backup path unless something already exists there.
///
/// An existing backup is never overwritten.
pub fn create_backup(input: &Path) -> Result<BackupOutcome> {
    let path = backup_path(input);
    if path.exists() {
        tracing::debug!(path = %path.display(), "backup already exists");
        return Ok(BackupOutcome::AlreadyExists(path));
    }
    std::fs::copy(input, &path)?;
    tracing::info!(path = %path.display(), "backup created");
    Ok(BackupOutcome::Created(path))
}
