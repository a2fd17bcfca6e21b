//! Error types for checkin-core operations.
//!
//! Only configuration and environment failures surface as errors. Problems
//! with a single user's status file during aggregation are skipped where they
//! happen and never reach this type.

use std::path::PathBuf;

/// All errors that can occur in checkin-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Unknown status label: {0}")]
    UnknownLabel(String),

    #[error("Users root cannot be listed: {path}: {source}")]
    UsersRootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Environment Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Cannot resolve current user: {0}")]
    UserLookup(String),

    #[error("Cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("Terminal unavailable: {0}")]
    Terminal(#[source] std::io::Error),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Status write failed: {path}: {source}")]
    StatusWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using CheckinError.
pub type Result<T> = std::result::Result<T, CheckinError>;
