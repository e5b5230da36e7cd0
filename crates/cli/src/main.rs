mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use downtime_core::config::{load_dotenv, Config};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();

    match args.command {
        Command::Validate { file } => commands::validate(&file),
        Command::Build { file, update } => commands::build(&file, update),
        Command::Check { dir } => commands::check(dir.unwrap_or_else(|| config.downtime_dir.clone())),
        Command::Apply { file, account_id } => commands::apply(&config, &file, account_id).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
    }
}
