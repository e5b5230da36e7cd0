//! Create/update payloads for the external downtime API.
//!
//! Built from a validated [`DowntimeSchedule`], so building is infallible:
//! the model already guarantees exactly the mode-legal fields are present.
//! Field names are camelCase on the wire; timestamps stay naive and travel
//! with a separate `timezone`.

use serde::Serialize;

use crate::datetime::{format_naive_date, format_naive_datetime};
use crate::model::{DowntimeSchedule, EndRepeat, MonthlyFrequency, Recurrence};
use crate::schema::Mode;
use crate::vocab::{Ordinal, Weekday};

/// Payload for creating a downtime window.
///
/// ```json
/// {"mode":"WEEKLY","name":"…","monitorGuids":[…],"startTime":"2024-01-09T22:00:00",
///  "endTime":"2024-01-09T23:30:00","timezone":"Europe/London","maintenanceDays":["TUESDAY"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCreateInput {
    pub name: String,
    pub monitor_guids: Vec<String>,
    #[serde(flatten)]
    pub window: WindowInput,
    #[serde(flatten)]
    pub recurrence: RecurrenceInput,
}

impl ExternalCreateInput {
    pub fn mode(&self) -> Mode {
        match self.recurrence {
            RecurrenceInput::Once => Mode::Once,
            RecurrenceInput::Daily { .. } => Mode::Daily,
            RecurrenceInput::Weekly { .. } => Mode::Weekly,
            RecurrenceInput::Monthly { .. } => Mode::Monthly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInput {
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
}

/// Mode discriminator plus the fields that mode carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "mode",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum RecurrenceInput {
    Once,
    Daily {
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
    },
    Weekly {
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
        maintenance_days: Vec<Weekday>,
    },
    Monthly {
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
        frequency: FrequencyInput,
    },
}

/// `{"onDate": "2024-12-31"}` or `{"onRepeat": 4}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EndRepeatInput {
    OnDate(String),
    OnRepeat(u32),
}

/// `{"daysOfMonth": [..]}` or `{"daysOfWeek": {..}}`; never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FrequencyInput {
    DaysOfMonth(Vec<u8>),
    DaysOfWeek(DaysOfWeekInput),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaysOfWeekInput {
    pub ordinal_day_of_month: Ordinal,
    pub week_day: Weekday,
}

/// Payload for editing an existing window in place. The mode cannot change,
/// so exactly one of the `once`/`daily`/`weekly`/`monthly` blocks is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalUpdateInput {
    pub name: String,
    pub monitor_guids: Vec<String>,
    #[serde(flatten)]
    pub config: UpdateConfig,
}

impl ExternalUpdateInput {
    pub fn mode(&self) -> Mode {
        match self.config {
            UpdateConfig::Once { .. } => Mode::Once,
            UpdateConfig::Daily { .. } => Mode::Daily,
            UpdateConfig::Weekly { .. } => Mode::Weekly,
            UpdateConfig::Monthly { .. } => Mode::Monthly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum UpdateConfig {
    Once {
        #[serde(flatten)]
        window: WindowInput,
    },
    Daily {
        #[serde(flatten)]
        window: WindowInput,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
    },
    Weekly {
        #[serde(flatten)]
        window: WindowInput,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
        maintenance_days: Vec<Weekday>,
    },
    Monthly {
        #[serde(flatten)]
        window: WindowInput,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_repeat: Option<EndRepeatInput>,
        frequency: FrequencyInput,
    },
}

// ── Builders ────────────────────────────────────────────────────────

/// Build the create payload for a validated schedule.
pub fn build(schedule: &DowntimeSchedule) -> ExternalCreateInput {
    let recurrence = match schedule.recurrence() {
        Recurrence::Once => RecurrenceInput::Once,
        Recurrence::Daily { end_repeat } => RecurrenceInput::Daily {
            end_repeat: end_repeat.map(end_repeat_input),
        },
        Recurrence::Weekly {
            end_repeat,
            maintenance_days,
        } => RecurrenceInput::Weekly {
            end_repeat: end_repeat.map(end_repeat_input),
            maintenance_days: maintenance_days.as_slice().to_vec(),
        },
        Recurrence::Monthly {
            end_repeat,
            frequency,
        } => RecurrenceInput::Monthly {
            end_repeat: end_repeat.map(end_repeat_input),
            frequency: frequency_input(frequency),
        },
    };

    ExternalCreateInput {
        name: schedule.name().to_string(),
        monitor_guids: schedule.monitor_guids().to_vec(),
        window: window_input(schedule),
        recurrence,
    }
}

/// Build the in-place edit payload for a validated schedule.
pub fn build_update(schedule: &DowntimeSchedule) -> ExternalUpdateInput {
    let window = window_input(schedule);
    let config = match schedule.recurrence() {
        Recurrence::Once => UpdateConfig::Once { window },
        Recurrence::Daily { end_repeat } => UpdateConfig::Daily {
            window,
            end_repeat: end_repeat.map(end_repeat_input),
        },
        Recurrence::Weekly {
            end_repeat,
            maintenance_days,
        } => UpdateConfig::Weekly {
            window,
            end_repeat: end_repeat.map(end_repeat_input),
            maintenance_days: maintenance_days.as_slice().to_vec(),
        },
        Recurrence::Monthly {
            end_repeat,
            frequency,
        } => UpdateConfig::Monthly {
            window,
            end_repeat: end_repeat.map(end_repeat_input),
            frequency: frequency_input(frequency),
        },
    };

    ExternalUpdateInput {
        name: schedule.name().to_string(),
        monitor_guids: schedule.monitor_guids().to_vec(),
        config,
    }
}

fn window_input(schedule: &DowntimeSchedule) -> WindowInput {
    WindowInput {
        start_time: format_naive_datetime(&schedule.start_time()),
        end_time: format_naive_datetime(&schedule.end_time()),
        timezone: schedule.time_zone().name().to_string(),
    }
}

fn end_repeat_input(end_repeat: EndRepeat) -> EndRepeatInput {
    match end_repeat {
        EndRepeat::OnDate(date) => EndRepeatInput::OnDate(format_naive_date(&date)),
        EndRepeat::OnRepeat(n) => EndRepeatInput::OnRepeat(n),
    }
}

fn frequency_input(frequency: &MonthlyFrequency) -> FrequencyInput {
    match frequency {
        MonthlyFrequency::DaysOfMonth(days) => FrequencyInput::DaysOfMonth(days.as_slice().to_vec()),
        MonthlyFrequency::DaysOfWeek { ordinal, week_day } => FrequencyInput::DaysOfWeek(DaysOfWeekInput {
            ordinal_day_of_month: *ordinal,
            week_day: *week_day,
        }),
    }
}
