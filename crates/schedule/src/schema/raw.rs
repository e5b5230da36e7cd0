//! Raw configuration blocks.
//!
//! Every attribute is an `Option<Option<T>>`: `None` when the key is absent,
//! `Some(None)` for an explicit null, `Some(Some(v))` for a value. Integers
//! are read as `i64` so out-of-range values reach validation instead of
//! failing deserialization.

use serde::{Deserialize, Serialize};

use super::presence::explicit;

/// One downtime window exactly as configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScheduleConfig {
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub mode: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub monitor_guids: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub end_repeat: Option<Option<RawEndRepeat>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub maintenance_days: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Option<RawFrequency>>,
}

/// `end_repeat { on_date | on_repeat }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEndRepeat {
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub on_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub on_repeat: Option<Option<i64>>,
}

/// `frequency { days_of_month | days_of_week }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFrequency {
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub days_of_month: Option<Option<Vec<i64>>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Option<RawDaysOfWeek>>,
}

/// `days_of_week { ordinal_day_of_month, week_day }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDaysOfWeek {
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub ordinal_day_of_month: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub week_day: Option<Option<String>>,
}

impl RawScheduleConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
