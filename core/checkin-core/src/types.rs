//! Core types shared across checkin modules.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// One user's normalized status, stamped with the file's modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub owner: String,
    /// Normalized `~owner ...` line, or empty for "no status".
    pub text: String,
    pub captured_at: DateTime<Utc>,
}

impl StatusRecord {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A discovered status file. `owner` is the name of the directory holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFile {
    pub path: PathBuf,
    pub owner: String,
}

impl StatusFile {
    /// Builds a StatusFile from `<users-root>/<owner>/<file>`.
    /// Returns None when the path has no parent directory name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let owner = path.parent()?.file_name()?.to_str()?.to_string();
        Some(Self {
            path: path.to_path_buf(),
            owner,
        })
    }
}
