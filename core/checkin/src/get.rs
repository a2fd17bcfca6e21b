//! `checkin get`: print everyone's fresh statuses.

use checkin_core::{
    html, Aggregator, CheckinConfig, CheckinError, FsStatusStore, Label, Result, StatusRecord,
    StatusSource, UserEnv,
};
use std::io::Write;

pub struct GetArgs {
    pub freshness: Option<u32>,
    pub output_html: bool,
}

/// Listing only needs the clock; the invoking user is never looked up.
pub fn run(config: &CheckinConfig, label: &Label, env: &dyn UserEnv, args: GetArgs) -> Result<()> {
    let store = FsStatusStore::new(config, label);
    let stdout = std::io::stdout();
    print(config, &store, env, &args, &mut stdout.lock())
}

fn print<S: StatusSource + ?Sized>(
    config: &CheckinConfig,
    source: &S,
    env: &dyn UserEnv,
    args: &GetArgs,
    out: &mut impl Write,
) -> Result<()> {
    let freshness = args.freshness.unwrap_or(config.freshness_days);
    let records = Aggregator::new(source, freshness).statuses(env.now())?;

    if args.output_html {
        for line in html::render_list(records, &config.site) {
            writeln!(out, "{}", line).map_err(write_error)?;
        }
    } else {
        for record in records.filter(|r: &StatusRecord| !r.is_empty()) {
            writeln!(out, "{}", record.text).map_err(write_error)?;
        }
    }
    out.flush().map_err(write_error)
}

fn write_error(source: std::io::Error) -> CheckinError {
    CheckinError::Io {
        context: "writing statuses".to_string(),
        source,
    }
}
