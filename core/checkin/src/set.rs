//! `checkin set`: record (or clear) the invoking user's status.

use crate::prompt;
use checkin_core::{
    friendly_path, normalize_args, normalize_text, CancelPolicy, CaptureOutcome, CaptureState,
    CheckinConfig, Context, FsStatusStore, Label, Result, StatusChange, UserEnv,
};

pub struct SetArgs {
    pub include_wd: bool,
    pub words: Vec<String>,
}

pub fn run(config: &CheckinConfig, label: &Label, env: &dyn UserEnv, args: SetArgs) -> Result<()> {
    let ctx = Context::from_env(env)?;
    let username = &ctx.user.username;

    let status = if args.words.is_empty() {
        let outcome = prompt::capture(&label.prompt_for(username), &ctx.user.tilde())?;
        match resolve_outcome(outcome, config.on_cancel) {
            Some(status) => status,
            None => {
                tracing::debug!("Capture cancelled, keeping current status");
                return Ok(());
            }
        }
    } else {
        normalize_args(&args.words, username)
    };

    let status = compose(config, &ctx, &status, args.include_wd)?;
    let store = FsStatusStore::new(config, label);
    match store.apply(&ctx.user, &status)? {
        StatusChange::Written(path) => {
            tracing::info!(path = %path.display(), "Status written")
        }
        StatusChange::Removed(path) => {
            tracing::info!(path = %path.display(), "Status removed")
        }
        StatusChange::AlreadyAbsent(path) => {
            tracing::debug!(path = %path.display(), "No status to remove")
        }
    }
    Ok(())
}

/// What to store after an interactive capture; `None` leaves the file alone.
fn resolve_outcome(outcome: CaptureOutcome, policy: CancelPolicy) -> Option<String> {
    match (outcome.state, policy) {
        (CaptureState::Cancelled(reason), CancelPolicy::Keep) => {
            tracing::debug!(?reason, "Capture cancelled");
            None
        }
        (CaptureState::Cancelled(_), CancelPolicy::Clear) => Some(String::new()),
        _ => Some(outcome.status),
    }
}

/// Normalizes the status and, when asked, appends the friendly working
/// directory. An empty status stays empty so it still clears the file.
fn compose(config: &CheckinConfig, ctx: &Context, status: &str, include_wd: bool) -> Result<String> {
    let status = normalize_text(status, &ctx.user.username);
    if status.is_empty() || !include_wd {
        return Ok(status);
    }

    let cwd = ctx.require_cwd()?;
    let friendly = friendly_path::resolve(&ctx.user, cwd, &config.site);
    Ok(format!("{} ({})", status, friendly))
}
