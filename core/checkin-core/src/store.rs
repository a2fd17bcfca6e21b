//! Status file storage.
//!
//! Each user owns exactly one file per label, `<home>/<label.file_name>`.
//! Reads go through [`StatusSource`] so the aggregator can run against an
//! in-memory source in tests. Writes replace the whole file atomically.

use crate::config::{CheckinConfig, Label};
use crate::env::Identity;
use crate::error::{CheckinError, Result};
use crate::types::StatusFile;
use fs_err as fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Read side of status storage, as seen by the aggregator.
pub trait StatusSource {
    /// Snapshot of every status file currently present under the users root.
    fn discover(&self) -> Result<Vec<StatusFile>>;

    fn modified(&self, file: &StatusFile) -> io::Result<SystemTime>;

    fn read(&self, file: &StatusFile) -> io::Result<Vec<u8>>;
}

/// Outcome of applying a status for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Written(PathBuf),
    Removed(PathBuf),
    /// Empty status and no file to remove.
    AlreadyAbsent(PathBuf),
}

/// Filesystem-backed status storage for one label.
#[derive(Debug, Clone)]
pub struct FsStatusStore {
    users_root: PathBuf,
    file_name: String,
    file_mode: u32,
}

impl FsStatusStore {
    pub fn new(config: &CheckinConfig, label: &Label) -> Self {
        Self {
            users_root: config.users_root.clone(),
            file_name: label.file_name.clone(),
            file_mode: config.file_mode,
        }
    }

    /// `<home>/<file_name>` for the given user.
    pub fn status_path(&self, user: &Identity) -> PathBuf {
        user.home_dir.join(&self.file_name)
    }

    /// Writes a non-empty status or removes the file for an empty one.
    pub fn apply(&self, user: &Identity, status: &str) -> Result<StatusChange> {
        if status.is_empty() {
            self.delete(user)
        } else {
            self.write(user, status).map(StatusChange::Written)
        }
    }

    /// Replaces the user's status file with `status` plus a trailing newline.
    ///
    /// The new content is written to a temp file in the same directory and
    /// renamed over the old one, so readers see either the old or new status.
    pub fn write(&self, user: &Identity, status: &str) -> Result<PathBuf> {
        let path = self.status_path(user);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let write_failed = |source: io::Error| CheckinError::StatusWriteFailed {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(status.as_bytes()).map_err(write_failed)?;
        tmp.write_all(b"\n").map_err(write_failed)?;
        tmp.flush().map_err(write_failed)?;
        set_mode(tmp.as_file(), self.file_mode).map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;

        tracing::debug!(path = %path.display(), "Status written");
        Ok(path)
    }

    /// Removes the user's status file. A missing file counts as success.
    pub fn delete(&self, user: &Identity) -> Result<StatusChange> {
        let path = self.status_path(user);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Status removed");
                Ok(StatusChange::Removed(path))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StatusChange::AlreadyAbsent(path)),
            Err(e) => Err(CheckinError::StatusWriteFailed { path, source: e }),
        }
    }
}

impl StatusSource for FsStatusStore {
    /// Equivalent of globbing `<users-root>/*/<file_name>`.
    fn discover(&self) -> Result<Vec<StatusFile>> {
        std::fs::read_dir(&self.users_root).map_err(|e| CheckinError::UsersRootUnreadable {
            path: self.users_root.clone(),
            source: e,
        })?;

        let files = WalkDir::new(&self.users_root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable users root entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.path().join(&self.file_name))
            .filter(|candidate| candidate.exists())
            .filter_map(|candidate| StatusFile::from_path(&candidate))
            .collect();
        Ok(files)
    }

    fn modified(&self, file: &StatusFile) -> io::Result<SystemTime> {
        fs::metadata(&file.path)?.modified()
    }

    fn read(&self, file: &StatusFile) -> io::Result<Vec<u8>> {
        fs::read(&file.path)
    }
}

#[cfg(unix)]
fn set_mode(file: &std::fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &std::fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}
