//! Multi-user status aggregation.
//!
//! ## Partial-failure policy
//!
//! Other users can rewrite or delete their files while we scan, and some files
//! are simply unreadable to us. Any stat or read failure skips that one file;
//! only failing to list the users root is an error.
//!
//! Records come out in discovery order, not sorted by time.

use crate::error::Result;
use crate::normalize::normalize_status;
use crate::store::StatusSource;
use crate::types::{StatusFile, StatusRecord};
use chrono::{DateTime, Duration, Utc};

pub struct Aggregator<'a, S: StatusSource + ?Sized> {
    source: &'a S,
    freshness: Duration,
}

impl<'a, S: StatusSource + ?Sized> Aggregator<'a, S> {
    pub fn new(source: &'a S, freshness_days: u32) -> Self {
        Self {
            source,
            freshness: Duration::days(i64::from(freshness_days)),
        }
    }

    /// Statuses must be modified strictly after this instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.freshness)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Takes a snapshot of the status files and returns a lazy iterator over
    /// the fresh ones. Records that normalize to empty are still yielded.
    pub fn statuses(&self, now: DateTime<Utc>) -> Result<Statuses<'a, S>> {
        let files = self.source.discover()?;
        tracing::debug!(count = files.len(), "Discovered status files");
        Ok(Statuses {
            source: self.source,
            files: files.into_iter(),
            cutoff: self.cutoff(now),
        })
    }
}

/// Lazy sequence of fresh, normalized statuses.
pub struct Statuses<'a, S: StatusSource + ?Sized> {
    source: &'a S,
    files: std::vec::IntoIter<StatusFile>,
    cutoff: DateTime<Utc>,
}

fn load<S: StatusSource + ?Sized>(
    source: &S,
    cutoff: DateTime<Utc>,
    file: &StatusFile,
) -> Option<StatusRecord> {
    let modified = match source.modified(file) {
        Ok(modified) => DateTime::<Utc>::from(modified),
        Err(e) => {
            tracing::debug!(path = %file.path.display(), error = %e, "Skipping status (stat failed)");
            return None;
        }
    };

    if modified <= cutoff {
        return None;
    }

    let raw = match source.read(file) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(path = %file.path.display(), error = %e, "Skipping status (read failed)");
            return None;
        }
    };

    Some(StatusRecord {
        owner: file.owner.clone(),
        text: normalize_status(&raw, &file.owner),
        captured_at: modified,
    })
}

impl<S: StatusSource + ?Sized> Iterator for Statuses<'_, S> {
    type Item = StatusRecord;

    fn next(&mut self) -> Option<StatusRecord> {
        let (source, cutoff) = (self.source, self.cutoff);
        self.files.by_ref().find_map(|file| load(source, cutoff, &file))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.files.len()))
    }
}
