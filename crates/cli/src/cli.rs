use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Validate and apply monitor downtime schedules.
///
/// Downtime files are YAML documents describing one window each. Every
/// command validates first and reports all violations at once.
#[derive(Parser, Debug)]
#[command(name = "downtime", version, about = "Validate and apply monitor downtime schedules")]
pub struct CliArgs {
    /// Config profile; keys are read as {PROFILE}_{KEY} before {KEY}
    #[arg(long, env = "DOWNTIME_PROFILE", global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one downtime file and print every violation
    Validate {
        file: PathBuf,
    },

    /// Print the API payload for a downtime file
    Build {
        file: PathBuf,

        /// Emit the in-place edit payload instead of the create payload
        #[arg(long)]
        update: bool,
    },

    /// Validate every downtime file under a directory
    Check {
        /// Defaults to DOWNTIME_DIR from the active profile
        dir: Option<PathBuf>,
    },

    /// Apply a downtime file and verify it reads back unchanged
    Apply {
        file: PathBuf,

        /// Account to create the downtime in (overrides NEW_RELIC_ACCOUNT_ID)
        #[arg(long)]
        account_id: Option<u64>,
    },

    /// Show the resolved configuration
    Config,
}
