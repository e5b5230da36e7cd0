//! Subcommand implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use downtime_core::config::Config;
use downtime_schedule::client::{apply as apply_schedule, refresh, InMemoryDowntimeApi};
use downtime_schedule::loader::{DowntimeLoader, LoadStatus};
use downtime_schedule::validation::{validate_yaml, ValidationErrors, ValidationWarning};
use downtime_schedule::{build as build_create, build_update, DowntimeSchedule};

fn print_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        eprintln!("warning: {}: {}", warning.path, warning.message);
    }
}

/// Read and validate one file, printing warnings along the way.
fn load_schedule(file: &Path) -> Result<DowntimeSchedule> {
    let yaml = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let report = validate_yaml(&yaml);
    print_warnings(&report.result.warnings);
    match report.schedule {
        Some(schedule) => Ok(schedule),
        None => Err(anyhow::Error::new(ValidationErrors(report.result.errors))
            .context(format!("{} is not a valid downtime", file.display()))),
    }
}

pub fn validate(file: &Path) -> Result<()> {
    let schedule = load_schedule(file)?;
    println!("OK: {} ({})", schedule.name(), schedule.mode());
    Ok(())
}

pub fn build(file: &Path, update: bool) -> Result<()> {
    let schedule = load_schedule(file)?;
    let json = if update {
        serde_json::to_string_pretty(&build_update(&schedule))?
    } else {
        serde_json::to_string_pretty(&build_create(&schedule))?
    };
    println!("{json}");
    Ok(())
}

pub fn check(dir: PathBuf) -> Result<()> {
    let loader = DowntimeLoader::new(dir);
    let results = loader
        .load_all()
        .with_context(|| format!("failed to scan {}", loader.dir().display()))?;

    let mut failed = 0;
    for result in &results {
        match &result.status {
            LoadStatus::Loaded { id, mode, warnings } => {
                println!("ok      {} ({id}, {mode})", result.path.display());
                print_warnings(warnings);
            }
            LoadStatus::Skipped { reason } => {
                println!("skipped {} ({reason})", result.path.display());
            }
            LoadStatus::Failed { error } => {
                failed += 1;
                println!("FAILED  {}\n{error}", result.path.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} downtime files failed validation", results.len());
    }
    Ok(())
}

pub async fn apply(config: &Config, file: &Path, account_id: Option<u64>) -> Result<()> {
    if !config.dry_run {
        bail!("no remote downtime API is configured; set DOWNTIME_DRY_RUN=true to apply against the in-memory platform");
    }
    let account_id = match account_id {
        Some(id) => id,
        None => config.account_id()?,
    };

    let schedule = load_schedule(file)?;
    let api = InMemoryDowntimeApi::new();
    let outcome = apply_schedule(&api, account_id, None, &schedule).await?;
    info!(guid = outcome.guid(), account_id, "applied downtime (dry run)");

    let read = refresh(&api, outcome.guid())
        .await?
        .context("downtime vanished after apply")?;
    if read != schedule {
        bail!("downtime '{}' read back differently from its configuration", schedule.name());
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
