use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DowntimeError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Raw account identifier as found in the environment. Parsed lazily by
    /// [`Config::account_id`] so a bad value only fails commands that need it.
    pub account_id: Option<String>,
    /// Directory scanned for downtime YAML files.
    pub downtime_dir: PathBuf,
    /// When set, mutations go to the in-memory platform instead of a remote one.
    pub dry_run: bool,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DOWNTIME_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("DOWNTIME_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            account_id: profiled_env_opt(p, "NEW_RELIC_ACCOUNT_ID"),
            downtime_dir: PathBuf::from(profiled_env_or(p, "DOWNTIME_DIR", "data/downtimes")),
            dry_run: profiled_env_bool(p, "DOWNTIME_DRY_RUN", true),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Parse the configured account id, or explain why it is unusable.
    pub fn account_id(&self) -> Result<u64> {
        let raw = self.account_id.as_deref().ok_or_else(|| {
            DowntimeError::Config("NEW_RELIC_ACCOUNT_ID is not set".to_string())
        })?;
        raw.trim().parse::<u64>().map_err(|_| {
            DowntimeError::Config(format!(
                "NEW_RELIC_ACCOUNT_ID must be a positive integer, got '{}'",
                raw
            ))
        })
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  account:     id={}", self.account_id.as_deref().unwrap_or("(none)"));
        tracing::info!("  downtimes:   dir={}", self.downtime_dir.display());
        tracing::info!("  dry_run:     {}", self.dry_run);
    }

    /// Return a summary view safe for printing.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "account_id": self.account_id,
            "downtime_dir": self.downtime_dir,
            "dry_run": self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiled_keys_take_precedence() {
        env::set_var("CFGTESTA_NEW_RELIC_ACCOUNT_ID", "4242");
        env::set_var("CFGTESTA_DOWNTIME_DRY_RUN", "false");
        let config = Config::for_profile("cfgtesta");
        assert_eq!(config.profile, "CFGTESTA");
        assert_eq!(config.account_id().unwrap(), 4242);
        assert!(!config.dry_run);
    }

    #[test]
    fn bad_account_id_is_a_config_error() {
        env::set_var("CFGTESTB_NEW_RELIC_ACCOUNT_ID", "abc");
        let config = Config::for_profile("cfgtestb");
        let err = config.account_id().unwrap_err();
        assert!(matches!(err, DowntimeError::Config(_)));
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn default_profile_label() {
        let config = Config {
            profile: String::new(),
            account_id: None,
            downtime_dir: PathBuf::from("data/downtimes"),
            dry_run: true,
        };
        assert_eq!(config.profile_label(), "default");
        assert!(config.account_id().is_err());
        assert_eq!(config.redacted_summary()["dry_run"], true);
    }
}
