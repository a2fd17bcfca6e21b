//! checkin: let the other users on a shared host know what you're up to.
//!
//! ## Subcommands
//!
//! - `set`: Write your status from arguments, or prompt for it interactively
//! - `get`: Print everyone's statuses from the last couple of weeks

mod get;
mod logging;
mod prompt;
mod set;

use checkin_core::config::DEFAULT_LABEL;
use checkin_core::{CheckinConfig, SystemEnv};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "checkin")]
#[command(about = "Share a one-line status with the other users on this host")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Status board to use (e.g. "checkin", "venture")
    #[arg(long, global = true, default_value = DEFAULT_LABEL)]
    label: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set your status; prompts when no status is given. An empty status clears it.
    Set {
        /// Append the current working directory to the status
        #[arg(long)]
        include_wd: bool,

        /// Status text
        #[arg(value_name = "STATUS", trailing_var_arg = true, allow_hyphen_values = true)]
        status: Vec<String>,
    },

    /// Print recent statuses, one per line
    Get {
        /// Only show statuses updated within this many days
        #[arg(long, value_name = "DAYS")]
        freshness: Option<u32>,

        /// Print an HTML list instead of plain lines
        #[arg(long)]
        output_html: bool,
    },
}

fn main() {
    let logging_guard = logging::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "checkin failed");
        eprintln!("checkin: {}", e);
        drop(logging_guard);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> checkin_core::Result<()> {
    let config = CheckinConfig::load(cli.config.as_deref())?;
    let label = config.label(&cli.label)?;

    match cli.command {
        Commands::Set { include_wd, status } => set::run(
            &config,
            label,
            &SystemEnv,
            set::SetArgs {
                include_wd,
                words: status,
            },
        ),
        Commands::Get {
            freshness,
            output_html,
        } => get::run(
            &config,
            label,
            &SystemEnv,
            get::GetArgs {
                freshness,
                output_html,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_collects_status_words() {
        let cli = Cli::try_parse_from(["checkin", "set", "--include-wd", "eating", "-", "lunch"])
            .unwrap();
        match cli.command {
            Commands::Set { include_wd, status } => {
                assert!(include_wd);
                assert_eq!(status, vec!["eating", "-", "lunch"]);
            }
            Commands::Get { .. } => panic!("expected set"),
        }
        assert_eq!(cli.label, "checkin");
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "checkin",
            "get",
            "--freshness",
            "3",
            "--output-html",
            "--label",
            "venture",
        ])
        .unwrap();
        assert_eq!(cli.label, "venture");
        match cli.command {
            Commands::Get {
                freshness,
                output_html,
            } => {
                assert_eq!(freshness, Some(3));
                assert!(output_html);
            }
            Commands::Set { .. } => panic!("expected get"),
        }
    }
}
