//! # checkin-core
//!
//! Core library for checkin, a "what are you up to?" board for shared hosts.
//! Every user keeps a one-line status in a hidden file in their home
//! directory; anyone can list everybody's recent statuses.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. One invocation, one thread.
//! - **Graceful degradation**: A bad or vanished status file is skipped, never fatal.
//! - **Explicit context**: User, working directory and clock arrive through
//!   [`Context`]; nothing here reads process globals.
//! - **Terminal-free**: The capture state machine sees [`KeyInput`]s, not a tty.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkin_core::{Aggregator, CheckinConfig, FsStatusStore};
//!
//! let config = CheckinConfig::load(None)?;
//! let store = FsStatusStore::new(&config, config.label("checkin")?);
//! for record in Aggregator::new(&store, config.freshness_days).statuses(chrono::Utc::now())? {
//!     println!("{}", record.text);
//! }
//! ```

pub mod aggregate;
pub mod capture;
pub mod config;
pub mod env;
pub mod error;
pub mod friendly_path;
pub mod html;
pub mod links;
pub mod normalize;
pub mod patterns;
pub mod store;
pub mod types;

pub use aggregate::{Aggregator, Statuses};
pub use capture::{
    CancelReason, CaptureOutcome, CaptureSession, CaptureState, CaptureView, EventSource,
    KeyInput, LineEditor, NoView, ScriptedKeys,
};
pub use config::{CancelPolicy, CheckinConfig, Label, SiteConfig};
pub use env::{Context, Identity, SystemEnv, UserEnv};
pub use error::{CheckinError, Result};
pub use friendly_path::{FallbackReason, FriendlyPath, RelativizeError};
pub use links::{find_links, LinkSpan};
pub use normalize::{normalize_args, normalize_status, normalize_text};
pub use store::{FsStatusStore, StatusChange, StatusSource};
pub use types::{StatusFile, StatusRecord};
