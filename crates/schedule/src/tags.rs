//! Entity-tag read-back.
//!
//! The platform does not echo a downtime's configuration back as structured
//! data; it exposes it as string tags on the downtime entity. Timestamps are
//! epoch milliseconds, weekdays use two-letter aliases and an ordinal weekday
//! is packed as `ORDINAL:WEEKDAY`.
//!
//! [`to_entity_tags`] renders a create payload the way the platform stores it
//! and [`from_entity`] reconstructs a [`RawScheduleConfig`], which is then
//! re-validated like any operator-written configuration.

use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::datetime::{format_naive_date, format_naive_datetime, parse_naive_date, parse_naive_datetime, DateTimeError};
use crate::dto::{EndRepeatInput, ExternalCreateInput, FrequencyInput, RecurrenceInput};
use crate::schema::{set, RawDaysOfWeek, RawEndRepeat, RawFrequency, RawScheduleConfig};
use crate::timezone::{local_from_epoch_millis, parse_time_zone, resolve_instant, TimeZoneError};
use crate::vocab::Weekday;

pub const TAG_ACCOUNT_ID: &str = "accountId";
pub const TAG_MODE: &str = "type";
pub const TAG_TIMEZONE: &str = "timezone";
pub const TAG_START_TIME: &str = "startTime";
pub const TAG_END_TIME: &str = "endTime";
pub const TAG_WEEK_DAY: &str = "weekDay";
pub const TAG_END_REPEAT: &str = "endRepeat";
pub const TAG_OCCURRENCES: &str = "occurrences";
pub const TAG_MONTH_DAY: &str = "monthDay";
pub const TAG_SPECIFIC_WEEK_DAY: &str = "specificWeekDay";

/// Mode token the platform reports for one-time windows.
const REMOTE_ONCE: &str = "ONE_TIME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTag {
    pub key: String,
    pub values: Vec<String>,
}

impl EntityTag {
    pub fn new(key: &str, values: impl IntoIterator<Item = String>) -> Self {
        Self {
            key: key.to_string(),
            values: values.into_iter().collect(),
        }
    }

    fn single(key: &str, value: impl ToString) -> Self {
        Self::new(key, [value.to_string()])
    }
}

/// A downtime entity as read from the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowntimeEntity {
    pub guid: String,
    pub name: String,
    /// Monitors related to the downtime entity.
    pub monitor_guids: Vec<String>,
    pub tags: Vec<EntityTag>,
}

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("entity tag '{0}' is missing")]
    Missing(&'static str),

    #[error("entity tag '{key}' has a non-numeric value '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("entity tag 'weekDay' has an unknown day alias '{0}'")]
    UnknownDayAlias(String),

    #[error("entity tag 'specificWeekDay' is not of the form ORDINAL:WEEKDAY: '{0}'")]
    MalformedSpecificWeekDay(String),

    #[error(transparent)]
    TimeZone(#[from] TimeZoneError),

    #[error(transparent)]
    DateTime(#[from] DateTimeError),
}

// ── Reading ─────────────────────────────────────────────────────────

fn values<'a>(tags: &'a [EntityTag], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    tags.iter()
        .filter(move |t| t.key == key)
        .flat_map(|t| t.values.iter().map(String::as_str))
}

/// Last value wins when a key repeats.
fn last_value<'a>(tags: &'a [EntityTag], key: &'a str) -> Option<&'a str> {
    values(tags, key).last()
}

fn required<'a>(tags: &'a [EntityTag], key: &'static str) -> Result<&'a str, TagError> {
    last_value(tags, key).ok_or(TagError::Missing(key))
}

fn number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, TagError> {
    value.trim().parse().map_err(|_| TagError::NotANumber {
        key,
        value: value.to_string(),
    })
}

/// Account the downtime was created in, if tagged.
pub fn account_id(tags: &[EntityTag]) -> Option<u64> {
    last_value(tags, TAG_ACCOUNT_ID).and_then(|v| v.parse().ok())
}

/// Reconstruct the raw configuration of a downtime entity.
///
/// Only the tag encoding is checked here; whether the result is a legal
/// schedule is left to validation.
pub fn from_entity(entity: &DowntimeEntity) -> Result<RawScheduleConfig, TagError> {
    let tags = entity.tags.as_slice();
    let zone_name = required(tags, TAG_TIMEZONE)?;
    let tz = parse_time_zone(zone_name)?;

    let mode = match required(tags, TAG_MODE)? {
        REMOTE_ONCE => "ONCE".to_string(),
        other => other.to_string(),
    };

    let mut raw = RawScheduleConfig {
        mode: set(mode),
        name: set(entity.name.clone()),
        monitor_guids: set(entity.monitor_guids.clone()),
        start_time: set(read_local_time(tags, TAG_START_TIME, tz)?),
        end_time: set(read_local_time(tags, TAG_END_TIME, tz)?),
        time_zone: set(zone_name.to_string()),
        ..Default::default()
    };

    let days = values(tags, TAG_WEEK_DAY)
        .map(|alias| {
            Weekday::from_alias(alias)
                .map(|d| d.as_str().to_string())
                .ok_or_else(|| TagError::UnknownDayAlias(alias.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if !days.is_empty() {
        raw.maintenance_days = set(days);
    }

    raw.end_repeat = read_end_repeat(tags, tz)?.map(Some);
    raw.frequency = read_frequency(tags)?.map(Some);
    Ok(raw)
}

fn read_local_time(tags: &[EntityTag], key: &'static str, tz: Tz) -> Result<String, TagError> {
    let millis: i64 = number(key, required(tags, key)?)?;
    Ok(format_naive_datetime(&local_from_epoch_millis(millis, tz)?))
}

fn read_end_repeat(tags: &[EntityTag], tz: Tz) -> Result<Option<RawEndRepeat>, TagError> {
    let on_date = match last_value(tags, TAG_END_REPEAT) {
        Some(v) => {
            let millis: i64 = number(TAG_END_REPEAT, v)?;
            Some(format_naive_date(&local_from_epoch_millis(millis, tz)?.date()))
        }
        None => None,
    };
    let on_repeat = match last_value(tags, TAG_OCCURRENCES) {
        Some(v) => Some(number::<i64>(TAG_OCCURRENCES, v)?),
        None => None,
    };

    if on_date.is_none() && on_repeat.is_none() {
        return Ok(None);
    }
    Ok(Some(RawEndRepeat {
        on_date: on_date.map(Some),
        on_repeat: on_repeat.map(Some),
    }))
}

fn read_frequency(tags: &[EntityTag]) -> Result<Option<RawFrequency>, TagError> {
    let days_of_month = values(tags, TAG_MONTH_DAY)
        .map(|v| number::<i64>(TAG_MONTH_DAY, v))
        .collect::<Result<Vec<_>, _>>()?;

    let days_of_week = match last_value(tags, TAG_SPECIFIC_WEEK_DAY) {
        Some(packed) => {
            let (ordinal, week_day) = packed
                .split_once(':')
                .ok_or_else(|| TagError::MalformedSpecificWeekDay(packed.to_string()))?;
            Some(RawDaysOfWeek {
                ordinal_day_of_month: set(ordinal.to_string()),
                week_day: set(week_day.to_string()),
            })
        }
        None => None,
    };

    if days_of_month.is_empty() && days_of_week.is_none() {
        return Ok(None);
    }
    Ok(Some(RawFrequency {
        days_of_month: (!days_of_month.is_empty()).then(|| Some(days_of_month)),
        days_of_week: days_of_week.map(Some),
    }))
}

// ── Writing ─────────────────────────────────────────────────────────

/// Render a create payload as the tags the platform attaches to the entity.
pub fn to_entity_tags(account_id: u64, input: &ExternalCreateInput) -> Result<Vec<EntityTag>, TagError> {
    let tz = parse_time_zone(&input.window.timezone)?;
    let start = resolve_instant(parse_naive_datetime(&input.window.start_time)?, tz)?;
    let end = resolve_instant(parse_naive_datetime(&input.window.end_time)?, tz)?;

    let mode = match &input.recurrence {
        RecurrenceInput::Once => REMOTE_ONCE,
        RecurrenceInput::Daily { .. } => "DAILY",
        RecurrenceInput::Weekly { .. } => "WEEKLY",
        RecurrenceInput::Monthly { .. } => "MONTHLY",
    };

    let mut tags = vec![
        EntityTag::single(TAG_ACCOUNT_ID, account_id),
        EntityTag::single(TAG_MODE, mode),
        EntityTag::single(TAG_TIMEZONE, tz.name()),
        EntityTag::single(TAG_START_TIME, start.timestamp_millis()),
        EntityTag::single(TAG_END_TIME, end.timestamp_millis()),
    ];

    let end_repeat = match &input.recurrence {
        RecurrenceInput::Once => None,
        RecurrenceInput::Daily { end_repeat }
        | RecurrenceInput::Weekly { end_repeat, .. }
        | RecurrenceInput::Monthly { end_repeat, .. } => end_repeat.as_ref(),
    };
    match end_repeat {
        Some(EndRepeatInput::OnDate(date)) => tags.push(EntityTag::single(
            TAG_END_REPEAT,
            date_to_epoch_millis(parse_naive_date(date)?, tz)?,
        )),
        Some(EndRepeatInput::OnRepeat(n)) => tags.push(EntityTag::single(TAG_OCCURRENCES, n)),
        None => {}
    }

    match &input.recurrence {
        RecurrenceInput::Weekly { maintenance_days, .. } => tags.push(EntityTag::new(
            TAG_WEEK_DAY,
            maintenance_days.iter().map(|d| d.alias().to_string()),
        )),
        RecurrenceInput::Monthly { frequency, .. } => match frequency {
            FrequencyInput::DaysOfMonth(days) => {
                tags.push(EntityTag::new(TAG_MONTH_DAY, days.iter().map(u8::to_string)));
            }
            FrequencyInput::DaysOfWeek(dow) => tags.push(EntityTag::single(
                TAG_SPECIFIC_WEEK_DAY,
                format!("{}:{}", dow.ordinal_day_of_month, dow.week_day),
            )),
        },
        RecurrenceInput::Once | RecurrenceInput::Daily { .. } => {}
    }

    Ok(tags)
}

/// Start of `date` in `tz` as epoch milliseconds. That is local midnight,
/// unless a daylight-saving jump skips it; then the first minute after the gap.
pub fn date_to_epoch_millis(date: NaiveDate, tz: Tz) -> Result<i64, TagError> {
    let midnight = date.and_time(NaiveTime::MIN);
    let start = (0..24 * 60)
        .map(|minutes| midnight + Duration::minutes(minutes))
        .find_map(|local| resolve_instant(local, tz).ok())
        .ok_or_else(|| TimeZoneError::NonexistentLocalTime {
            local: midnight,
            zone: tz.name().to_string(),
        })?;
    Ok(start.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::build;
    use crate::schema::Presence;
    use crate::validation::validate;

    fn entity(tags: Vec<EntityTag>) -> DowntimeEntity {
        DowntimeEntity {
            guid: "downtime-guid".to_string(),
            name: "Read back".to_string(),
            monitor_guids: vec!["monitor-1".to_string()],
            tags,
        }
    }

    fn round_trip(yaml: &str) {
        let schedule = validate(&RawScheduleConfig::from_yaml(yaml).unwrap()).unwrap();
        let tags = to_entity_tags(42, &build(&schedule)).unwrap();
        assert_eq!(account_id(&tags), Some(42));

        let read = DowntimeEntity {
            guid: "g".to_string(),
            name: schedule.name().to_string(),
            monitor_guids: schedule.monitor_guids().to_vec(),
            tags,
        };
        let raw = from_entity(&read).unwrap();
        assert_eq!(validate(&raw).unwrap(), schedule);
    }

    #[test]
    fn round_trip_every_mode() {
        round_trip(
            "mode: ONCE\nname: a\nstart_time: \"2024-03-10T01:30:00\"\nend_time: \"2024-03-10T04:00:00\"\ntime_zone: America/New_York\n",
        );
        round_trip(
            "mode: DAILY\nname: b\nstart_time: \"2024-01-01T23:00:00\"\nend_time: \"2024-01-02T01:00:00\"\ntime_zone: Australia/Sydney\nend_repeat:\n  on_date: \"2024-06-30\"\n",
        );
        round_trip(
            "mode: WEEKLY\nname: c\nmonitor_guids: [m1, m2]\nstart_time: \"2024-01-09T22:00:00\"\nend_time: \"2024-01-09T23:30:00\"\ntime_zone: Europe/London\nend_repeat:\n  on_repeat: 12\nmaintenance_days: [TUESDAY, SUNDAY]\n",
        );
        round_trip(
            "mode: MONTHLY\nname: d\nstart_time: \"2024-02-10T01:00:00\"\nend_time: \"2024-02-10T03:00:00\"\ntime_zone: UTC\nfrequency:\n  days_of_month: [1, 15, 31]\n",
        );
        round_trip(
            "mode: MONTHLY\nname: e\nstart_time: \"2024-02-10T01:00:00\"\nend_time: \"2024-02-10T03:00:00\"\ntime_zone: Asia/Tokyo\nfrequency:\n  days_of_week:\n    ordinal_day_of_month: LAST\n    week_day: FRIDAY\n",
        );
    }

    #[test]
    fn once_is_reported_as_one_time() {
        let schedule = validate(
            &RawScheduleConfig::from_yaml(
                "mode: ONCE\nname: a\nstart_time: \"2024-01-01T00:00:00\"\nend_time: \"2024-01-01T01:00:00\"\ntime_zone: UTC\n",
            )
            .unwrap(),
        )
        .unwrap();
        let tags = to_entity_tags(1, &build(&schedule)).unwrap();
        assert_eq!(last_value(&tags, TAG_MODE), Some("ONE_TIME"));
        assert_eq!(last_value(&tags, TAG_START_TIME), Some("1704067200000"));
    }

    #[test]
    fn reads_platform_encoding() {
        let raw = from_entity(&entity(vec![
            EntityTag::single(TAG_MODE, "WEEKLY"),
            EntityTag::single(TAG_TIMEZONE, "UTC"),
            EntityTag::single(TAG_START_TIME, "1704067200000"),
            EntityTag::single(TAG_END_TIME, "1704070800000"),
            EntityTag::new(TAG_WEEK_DAY, ["MO".to_string(), "FR".to_string()]),
            EntityTag::single(TAG_OCCURRENCES, "3"),
        ]))
        .unwrap();

        assert_eq!(raw.start_time, set("2024-01-01T00:00:00".to_string()));
        assert_eq!(raw.end_time, set("2024-01-01T01:00:00".to_string()));
        assert_eq!(raw.maintenance_days, set(vec!["MONDAY".to_string(), "FRIDAY".to_string()]));
        let end_repeat = raw.end_repeat.attr().value().unwrap();
        assert_eq!(end_repeat.on_repeat, set(3));
        assert!(end_repeat.on_date.attr().is_absent());
        assert!(raw.frequency.attr().is_absent());
    }

    #[test]
    fn missing_and_malformed_tags() {
        let err = from_entity(&entity(vec![EntityTag::single(TAG_TIMEZONE, "UTC")])).unwrap_err();
        assert!(matches!(err, TagError::Missing(TAG_MODE)));

        let err = from_entity(&entity(vec![
            EntityTag::single(TAG_MODE, "MONTHLY"),
            EntityTag::single(TAG_TIMEZONE, "UTC"),
            EntityTag::single(TAG_START_TIME, "1704067200000"),
            EntityTag::single(TAG_END_TIME, "1704070800000"),
            EntityTag::single(TAG_SPECIFIC_WEEK_DAY, "SECOND-SATURDAY"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TagError::MalformedSpecificWeekDay(_)));

        let err = from_entity(&entity(vec![
            EntityTag::single(TAG_MODE, "ONE_TIME"),
            EntityTag::single(TAG_TIMEZONE, "UTC"),
            EntityTag::single(TAG_START_TIME, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TagError::NotANumber { key: TAG_START_TIME, .. }));
    }

    #[test]
    fn end_date_skipped_midnight_moves_to_end_of_gap() {
        // Chile springs forward at 00:00 on 2024-09-08; the day starts at 01:00 -03.
        let tz = chrono_tz::America::Santiago;
        let millis = date_to_epoch_millis(NaiveDate::from_ymd_opt(2024, 9, 8).unwrap(), tz).unwrap();
        assert_eq!(millis, 1_725_768_000_000);
        assert_eq!(
            local_from_epoch_millis(millis, tz).unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 9, 8).unwrap()
        );

        round_trip(
            "mode: DAILY\nname: santiago\nstart_time: \"2024-01-01T02:00:00\"\nend_time: \"2024-01-01T03:00:00\"\ntime_zone: America/Santiago\nend_repeat:\n  on_date: \"2024-09-08\"\n",
        );
    }

    #[test]
    fn end_date_is_local_midnight() {
        let millis = date_to_epoch_millis(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), chrono_tz::Asia::Tokyo).unwrap();
        // 2024-06-29T15:00:00Z
        assert_eq!(millis, 1_719_673_200_000);
    }
}
