//! Logging setup for the checkin binary.
//!
//! Logs go to stderr so they never mix with statuses printed on stdout.
//! Level comes from `RUST_LOG` (default `warn`); `CHECKIN_DEBUG_LOG=1` forces
//! `debug`.

use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init() -> Option<WorkerGuard> {
    let debug_enabled = env::var("CHECKIN_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .ok()
        .map(|_| guard)
}
