//! Recurrence mode enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recurrence mode of a downtime window. Immutable once the window exists on
/// the platform; changing it means replacing the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl Mode {
    pub const TOKENS: [&'static str; 4] = ["ONCE", "DAILY", "WEEKLY", "MONTHLY"];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Once => "ONCE",
            Mode::Daily => "DAILY",
            Mode::Weekly => "WEEKLY",
            Mode::Monthly => "MONTHLY",
        }
    }

    /// Whether `end_repeat` may be supplied with this mode.
    pub fn repeats(self) -> bool {
        !matches!(self, Mode::Once)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ONCE" | "ONE_TIME" => Ok(Mode::Once),
            "DAILY" => Ok(Mode::Daily),
            "WEEKLY" => Ok(Mode::Weekly),
            "MONTHLY" => Ok(Mode::Monthly),
            other => Err(format!("unknown mode: '{}'", other)),
        }
    }
}
