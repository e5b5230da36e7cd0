//! Mode-independent checks: name, monitor GUIDs, start/end times, time zone.

use chrono::NaiveDateTime;
use chrono_tz::Tz;

use super::{ValidationResult, ViolationKind};
use crate::datetime::parse_naive_datetime;
use crate::schema::{Presence, RawScheduleConfig};
use crate::timezone::{known_time_zones, parse_time_zone};
use crate::validation::fuzzy::fuzzy_match;

/// Read a required string attribute. Absent and null both count as missing.
fn required<'a>(
    slot: &'a Option<Option<String>>,
    path: &str,
    result: &mut ValidationResult,
) -> Option<&'a str> {
    match slot.attr().value() {
        Some(value) => Some(value.as_str()),
        None => {
            result.error(
                ViolationKind::MissingField,
                path,
                format!("the argument `{path}` is required"),
            );
            None
        }
    }
}

pub(super) fn check_name(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<String> {
    let name = required(&raw.name, "name", result)?;
    if name.trim().is_empty() {
        result.error(ViolationKind::MissingField, "name", "the argument `name` must not be empty");
        return None;
    }
    Some(name.to_string())
}

/// Monitor GUIDs are opaque. Absent means account-wide; repeats are dropped.
pub(super) fn check_monitor_guids(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Vec<String> {
    let Some(guids) = raw.monitor_guids.attr().value() else {
        return Vec::new();
    };
    if guids.is_empty() {
        result.warn(
            "monitor_guids",
            "empty list; the downtime applies to every monitor in the account",
        );
    }
    let mut out: Vec<String> = Vec::with_capacity(guids.len());
    for (i, guid) in guids.iter().enumerate() {
        if out.contains(guid) {
            result.warn(format!("monitor_guids[{i}]"), format!("duplicate monitor GUID '{guid}'"));
        } else {
            out.push(guid.clone());
        }
    }
    out
}

/// Parse both ends of the window; ordering is only checked when both parse.
pub(super) fn check_window(
    raw: &RawScheduleConfig,
    result: &mut ValidationResult,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = required(&raw.start_time, "start_time", result).and_then(|s| parse_at("start_time", s, result));
    let end = required(&raw.end_time, "end_time", result).and_then(|s| parse_at("end_time", s, result));
    let (start, end) = (start?, end?);

    if end <= start {
        result.error(
            ViolationKind::InvalidTimeRange,
            "end_time",
            format!("`end_time` ({end}) must be after `start_time` ({start})"),
        );
        return None;
    }
    Some((start, end))
}

fn parse_at(path: &str, value: &str, result: &mut ValidationResult) -> Option<NaiveDateTime> {
    match parse_naive_datetime(value) {
        Ok(dt) => Some(dt),
        Err(e) => {
            result.error(ViolationKind::MalformedDateTime, path, e.to_string());
            None
        }
    }
}

pub(super) fn check_time_zone(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<Tz> {
    let name = required(&raw.time_zone, "time_zone", result)?;
    match parse_time_zone(name) {
        Ok(tz) => Some(tz),
        Err(e) => {
            let zones = known_time_zones();
            result.error_with_suggestion(
                ViolationKind::UnknownTimeZone,
                "time_zone",
                e.to_string(),
                fuzzy_match(name, &zones),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::set;

    fn raw_window(start: &str, end: &str) -> RawScheduleConfig {
        RawScheduleConfig {
            start_time: set(start.to_string()),
            end_time: set(end.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn ordering_is_strict() {
        let mut result = ValidationResult::new();
        let raw = raw_window("2024-01-01T10:00:00", "2024-01-01T10:00:00");
        assert!(check_window(&raw, &mut result).is_none());
        assert_eq!(result.errors[0].kind, ViolationKind::InvalidTimeRange);
        assert_eq!(result.errors[0].path, "end_time");
    }

    #[test]
    fn parse_failure_skips_ordering() {
        let mut result = ValidationResult::new();
        let raw = raw_window("2024-01-01T10:00:00Z", "2023-01-01T10:00:00");
        assert!(check_window(&raw, &mut result).is_none());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ViolationKind::MalformedDateTime);
        assert_eq!(result.errors[0].path, "start_time");
    }

    #[test]
    fn both_bounds_missing() {
        let mut result = ValidationResult::new();
        assert!(check_window(&RawScheduleConfig::default(), &mut result).is_none());
        let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["start_time", "end_time"]);
        assert!(result.errors.iter().all(|e| e.kind == ViolationKind::MissingField));
    }

    #[test]
    fn blank_name_is_missing() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            name: set("   ".to_string()),
            ..Default::default()
        };
        assert!(check_name(&raw, &mut result).is_none());
        assert_eq!(result.errors[0].kind, ViolationKind::MissingField);
    }

    #[test]
    fn time_zone_typo_gets_suggestion() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            time_zone: set("Europe/Berln".to_string()),
            ..Default::default()
        };
        assert!(check_time_zone(&raw, &mut result).is_none());
        assert_eq!(result.errors[0].kind, ViolationKind::UnknownTimeZone);
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn duplicate_guids_warn_and_collapse() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            monitor_guids: set(vec!["a".to_string(), "b".to_string(), "a".to_string()]),
            ..Default::default()
        };
        assert_eq!(check_monitor_guids(&raw, &mut result), ["a", "b"]);
        assert!(result.valid);
        assert_eq!(result.warnings[0].path, "monitor_guids[2]");
    }
}
