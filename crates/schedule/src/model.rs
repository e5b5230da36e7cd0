//! The validated downtime schedule.
//!
//! Each [`Recurrence`] variant carries only the sub-fields legal for its mode,
//! and the list newtypes can only be built inside this crate, so a
//! [`DowntimeSchedule`] that violates the mode/field invariants cannot be
//! constructed outside validation.

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::schema::Mode;
use crate::vocab::{Ordinal, Weekday};

/// When a recurring window stops recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndRepeat {
    OnDate(NaiveDate),
    /// Number of occurrences, at least one.
    OnRepeat(u32),
}

/// Non-empty, duplicate-free weekdays of a weekly window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceDays(Vec<Weekday>);

impl MaintenanceDays {
    /// Keeps first occurrences in configured order. `None` when empty.
    pub(crate) fn new(days: impl IntoIterator<Item = Weekday>) -> Option<Self> {
        let mut out: Vec<Weekday> = Vec::new();
        for day in days {
            if !out.contains(&day) {
                out.push(day);
            }
        }
        (!out.is_empty()).then_some(Self(out))
    }

    pub fn as_slice(&self) -> &[Weekday] {
        &self.0
    }
}

/// Non-empty, sorted, duplicate-free days of the month in `1..=31`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaysOfMonth(Vec<u8>);

impl DaysOfMonth {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 31;

    /// `None` when empty or when any value falls outside `1..=31`.
    pub(crate) fn new(days: impl IntoIterator<Item = i64>) -> Option<Self> {
        let mut out = Vec::new();
        for day in days {
            if !(Self::MIN..=Self::MAX).contains(&day) {
                return None;
            }
            out.push(day as u8);
        }
        out.sort_unstable();
        out.dedup();
        (!out.is_empty()).then_some(Self(out))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Which days of the month a monthly window runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyFrequency {
    DaysOfMonth(DaysOfMonth),
    DaysOfWeek { ordinal: Ordinal, week_day: Weekday },
}

/// Mode together with the sub-fields that mode allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    Once,
    Daily {
        end_repeat: Option<EndRepeat>,
    },
    Weekly {
        end_repeat: Option<EndRepeat>,
        maintenance_days: MaintenanceDays,
    },
    Monthly {
        end_repeat: Option<EndRepeat>,
        frequency: MonthlyFrequency,
    },
}

impl Recurrence {
    pub fn mode(&self) -> Mode {
        match self {
            Recurrence::Once => Mode::Once,
            Recurrence::Daily { .. } => Mode::Daily,
            Recurrence::Weekly { .. } => Mode::Weekly,
            Recurrence::Monthly { .. } => Mode::Monthly,
        }
    }

    pub fn end_repeat(&self) -> Option<EndRepeat> {
        match self {
            Recurrence::Once => None,
            Recurrence::Daily { end_repeat }
            | Recurrence::Weekly { end_repeat, .. }
            | Recurrence::Monthly { end_repeat, .. } => *end_repeat,
        }
    }
}

/// A validated downtime window. Immutable; an update re-validates into a
/// fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DowntimeSchedule {
    name: String,
    monitor_guids: Vec<String>,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    time_zone: Tz,
    recurrence: Recurrence,
}

impl DowntimeSchedule {
    pub(crate) fn new(
        name: String,
        monitor_guids: Vec<String>,
        (start_time, end_time): (NaiveDateTime, NaiveDateTime),
        time_zone: Tz,
        recurrence: Recurrence,
    ) -> Self {
        debug_assert!(end_time > start_time);
        Self {
            name,
            monitor_guids,
            start_time,
            end_time,
            time_zone,
            recurrence,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Empty means the window applies account-wide.
    pub fn monitor_guids(&self) -> &[String] {
        &self.monitor_guids
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    pub fn mode(&self) -> Mode {
        self.recurrence.mode()
    }
}
