//! Mode-dependent checks: which of `end_repeat`, `maintenance_days` and
//! `frequency` are required, optional or forbidden, and their contents.
//!
//! | block              | ONCE      | DAILY    | WEEKLY   | MONTHLY  |
//! |--------------------|-----------|----------|----------|----------|
//! | `end_repeat`       | forbidden | optional | optional | optional |
//! | `maintenance_days` | forbidden | forbidden| required | forbidden|
//! | `frequency`        | forbidden | forbidden| forbidden| required |
//!
//! A forbidden block is reported once and its contents are not inspected.

use super::{invalid_token, ValidationResult, ViolationKind};
use crate::datetime::parse_naive_date;
use crate::model::{DaysOfMonth, EndRepeat, MaintenanceDays, MonthlyFrequency, Recurrence};
use crate::schema::{Attr, Mode, Presence, RawDaysOfWeek, RawScheduleConfig};
use crate::vocab::{Ordinal, Weekday};

pub(super) fn resolve_mode(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<Mode> {
    let Some(token) = raw.mode.attr().value() else {
        result.error(
            ViolationKind::MissingField,
            "mode",
            format!("the argument `mode` is required; expected one of [{}]", Mode::TOKENS.join(", ")),
        );
        return None;
    };
    match token.parse::<Mode>() {
        Ok(mode) => Some(mode),
        Err(_) => {
            invalid_token(result, ViolationKind::InvalidMode, "mode", token, &Mode::TOKENS);
            None
        }
    }
}

pub(super) fn check_recurrence(
    mode: Mode,
    raw: &RawScheduleConfig,
    result: &mut ValidationResult,
) -> Option<Recurrence> {
    match mode {
        Mode::Once => {
            let end_repeat_ok = check_end_repeat(mode, raw, result).is_some();
            let days_ok = forbid_maintenance_days(mode, raw, result);
            let frequency_ok = forbid_frequency(mode, raw, result);
            (end_repeat_ok && days_ok && frequency_ok).then_some(Recurrence::Once)
        }
        Mode::Daily => {
            let end_repeat = check_end_repeat(mode, raw, result);
            let days_ok = forbid_maintenance_days(mode, raw, result);
            let frequency_ok = forbid_frequency(mode, raw, result);
            match (end_repeat, days_ok, frequency_ok) {
                (Some(end_repeat), true, true) => Some(Recurrence::Daily { end_repeat }),
                _ => None,
            }
        }
        Mode::Weekly => {
            let end_repeat = check_end_repeat(mode, raw, result);
            let maintenance_days = check_maintenance_days(raw, result);
            let frequency_ok = forbid_frequency(mode, raw, result);
            match (end_repeat, maintenance_days, frequency_ok) {
                (Some(end_repeat), Some(maintenance_days), true) => Some(Recurrence::Weekly {
                    end_repeat,
                    maintenance_days,
                }),
                _ => None,
            }
        }
        Mode::Monthly => {
            let end_repeat = check_end_repeat(mode, raw, result);
            let days_ok = forbid_maintenance_days(mode, raw, result);
            let frequency = check_frequency(raw, result);
            match (end_repeat, days_ok, frequency) {
                (Some(end_repeat), true, Some(frequency)) => Some(Recurrence::Monthly {
                    end_repeat,
                    frequency,
                }),
                _ => None,
            }
        }
    }
}

// ── Forbidden blocks ────────────────────────────────────────────────

fn forbid_maintenance_days(mode: Mode, raw: &RawScheduleConfig, result: &mut ValidationResult) -> bool {
    match raw.maintenance_days.attr().value() {
        Some(days) if !days.is_empty() => {
            result.error(
                ViolationKind::UnexpectedField,
                "maintenance_days",
                format!("the argument `maintenance_days` may only be used with the WEEKLY mode, not {mode}"),
            );
            false
        }
        _ => true,
    }
}

fn forbid_frequency(mode: Mode, raw: &RawScheduleConfig, result: &mut ValidationResult) -> bool {
    if raw.frequency.is_set() {
        result.error(
            ViolationKind::UnexpectedField,
            "frequency",
            format!("the argument `frequency` may only be used with the MONTHLY mode, not {mode}"),
        );
        return false;
    }
    true
}

// ── end_repeat ──────────────────────────────────────────────────────

/// `Some(None)` when no block was given, `None` when the block is invalid
/// or `mode` does not repeat.
fn check_end_repeat(mode: Mode, raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<Option<EndRepeat>> {
    if !mode.repeats() {
        if raw.end_repeat.is_set() {
            result.error(
                ViolationKind::UnexpectedField,
                "end_repeat",
                format!("the argument `end_repeat` may only be used with the modes DAILY, WEEKLY and MONTHLY, not {mode}"),
            );
            return None;
        }
        return Some(None);
    }

    let Some(block) = raw.end_repeat.attr().value() else {
        return Some(None);
    };

    let on_date = block.on_date.attr().value().map(|value| match parse_naive_date(value) {
        Ok(date) => Some(EndRepeat::OnDate(date)),
        Err(e) => {
            result.error(ViolationKind::MalformedDate, "end_repeat.on_date", e.to_string());
            None
        }
    });
    let on_repeat = block.on_repeat.attr().value().map(|&count| {
        match u32::try_from(count).ok().filter(|&n| n >= 1) {
            Some(n) => Some(EndRepeat::OnRepeat(n)),
            None => {
                result.error(
                    ViolationKind::OutOfRange,
                    "end_repeat.on_repeat",
                    format!("`on_repeat` must be a positive number of occurrences, got {count}"),
                );
                None
            }
        }
    });

    match (on_date, on_repeat) {
        (Some(end), None) | (None, Some(end)) => end.map(Some),
        (Some(_), Some(_)) => {
            result.error(
                ViolationKind::ExclusivityViolation,
                "end_repeat",
                "the block `end_repeat` requires only one of `on_date` or `on_repeat`, both were specified",
            );
            None
        }
        (None, None) => {
            result.error(
                ViolationKind::ExclusivityViolation,
                "end_repeat",
                "the block `end_repeat` requires one of `on_date` or `on_repeat` to be specified",
            );
            None
        }
    }
}

// ── maintenance_days ────────────────────────────────────────────────

fn check_maintenance_days(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<MaintenanceDays> {
    let days = match raw.maintenance_days.attr().value() {
        Some(days) if !days.is_empty() => days,
        _ => {
            result.error(
                ViolationKind::MissingField,
                "maintenance_days",
                "the argument `maintenance_days` is mandatory with the WEEKLY mode",
            );
            return None;
        }
    };

    let mut parsed = Vec::with_capacity(days.len());
    let mut ok = true;
    for (i, token) in days.iter().enumerate() {
        let path = format!("maintenance_days[{i}]");
        match token.parse::<Weekday>() {
            Ok(day) => {
                if parsed.contains(&day) {
                    result.warn(path, format!("{day} is listed more than once"));
                }
                parsed.push(day);
            }
            Err(_) => {
                invalid_token(result, ViolationKind::InvalidEnumValue, &path, token, &Weekday::TOKENS);
                ok = false;
            }
        }
    }

    if !ok {
        return None;
    }
    MaintenanceDays::new(parsed)
}

// ── frequency ───────────────────────────────────────────────────────

fn check_frequency(raw: &RawScheduleConfig, result: &mut ValidationResult) -> Option<MonthlyFrequency> {
    let Some(block) = raw.frequency.attr().value() else {
        result.error(
            ViolationKind::MissingField,
            "frequency",
            "the argument `frequency` is mandatory with the MONTHLY mode",
        );
        return None;
    };

    // An empty `days_of_month` list counts as not populated.
    let days_of_month = block
        .days_of_month
        .attr()
        .value()
        .filter(|days| !days.is_empty())
        .map(|days| check_days_of_month(days, result));
    let days_of_week = match block.days_of_week.attr() {
        Attr::Value(dow) => Some(check_days_of_week(dow, result)),
        Attr::Absent | Attr::Null => None,
    };

    match (days_of_month, days_of_week) {
        (Some(days), None) => days.map(MonthlyFrequency::DaysOfMonth),
        (None, Some(dow)) => dow,
        (Some(_), Some(_)) => {
            result.error(
                ViolationKind::ExclusivityViolation,
                "frequency",
                "the block `frequency` requires one of `days_of_month` or `days_of_week` but not both",
            );
            None
        }
        (None, None) => {
            result.error(
                ViolationKind::ExclusivityViolation,
                "frequency",
                "the block `frequency` requires one of `days_of_month` or `days_of_week` to be specified",
            );
            None
        }
    }
}

fn check_days_of_month(days: &[i64], result: &mut ValidationResult) -> Option<DaysOfMonth> {
    let mut ok = true;
    let mut seen = Vec::with_capacity(days.len());
    for (i, &day) in days.iter().enumerate() {
        let path = format!("frequency.days_of_month[{i}]");
        if !(DaysOfMonth::MIN..=DaysOfMonth::MAX).contains(&day) {
            result.error(
                ViolationKind::OutOfRange,
                path,
                format!("all `days_of_month` values need to be in the range of 1 and 31, got {day}"),
            );
            ok = false;
            continue;
        }
        if seen.contains(&day) {
            result.warn(path, format!("day {day} is listed more than once"));
        } else if day > 28 {
            result.warn(path, format!("day {day} does not occur in every month; those months are skipped"));
        }
        seen.push(day);
    }

    if !ok {
        return None;
    }
    DaysOfMonth::new(seen)
}

fn check_days_of_week(dow: &RawDaysOfWeek, result: &mut ValidationResult) -> Option<MonthlyFrequency> {
    let ordinal = match dow.ordinal_day_of_month.attr().value() {
        None => {
            result.error(
                ViolationKind::MissingField,
                "frequency.days_of_week.ordinal_day_of_month",
                "the block `days_of_week` requires `ordinal_day_of_month`",
            );
            None
        }
        Some(token) => match token.parse::<Ordinal>() {
            Ok(ordinal) => Some(ordinal),
            Err(_) => {
                invalid_token(
                    result,
                    ViolationKind::InvalidEnumValue,
                    "frequency.days_of_week.ordinal_day_of_month",
                    token,
                    &Ordinal::TOKENS,
                );
                None
            }
        },
    };

    let week_day = match dow.week_day.attr().value() {
        None => {
            result.error(
                ViolationKind::MissingField,
                "frequency.days_of_week.week_day",
                "the block `days_of_week` requires `week_day`",
            );
            None
        }
        Some(token) => match token.parse::<Weekday>() {
            Ok(day) => Some(day),
            Err(_) => {
                invalid_token(
                    result,
                    ViolationKind::InvalidEnumValue,
                    "frequency.days_of_week.week_day",
                    token,
                    &Weekday::TOKENS,
                );
                None
            }
        },
    };

    Some(MonthlyFrequency::DaysOfWeek {
        ordinal: ordinal?,
        week_day: week_day?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{set, RawEndRepeat, RawFrequency};

    fn end_repeat(on_date: Option<&str>, on_repeat: Option<i64>) -> RawScheduleConfig {
        RawScheduleConfig {
            end_repeat: set(RawEndRepeat {
                on_date: on_date.map(|d| Some(d.to_string())),
                on_repeat: on_repeat.map(Some),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn end_repeat_on_date() {
        let mut result = ValidationResult::new();
        let raw = end_repeat(Some("2024-12-31"), None);
        let parsed = check_end_repeat(Mode::Daily, &raw, &mut result).unwrap().unwrap();
        assert!(matches!(parsed, EndRepeat::OnDate(_)));
        assert!(result.valid);
    }

    #[test]
    fn end_repeat_bad_date_and_zero_repeat_both_reported() {
        let mut result = ValidationResult::new();
        let raw = end_repeat(Some("31/12/2024"), Some(0));
        assert!(check_end_repeat(Mode::Daily, &raw, &mut result).is_none());
        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                ViolationKind::MalformedDate,
                ViolationKind::OutOfRange,
                ViolationKind::ExclusivityViolation
            ]
        );
    }

    #[test]
    fn end_repeat_rejected_for_one_time_window() {
        let mut result = ValidationResult::new();
        let raw = end_repeat(Some("not a date"), Some(0));
        assert!(check_end_repeat(Mode::Once, &raw, &mut result).is_none());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ViolationKind::UnexpectedField);
        assert_eq!(result.errors[0].path, "end_repeat");

        let mut result = ValidationResult::new();
        assert_eq!(
            check_end_repeat(Mode::Once, &RawScheduleConfig::default(), &mut result),
            Some(None)
        );
        assert!(result.valid);
    }

    #[test]
    fn explicit_null_sub_field_is_not_populated() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            end_repeat: set(RawEndRepeat {
                on_date: Some(None),
                on_repeat: set(4),
            }),
            ..Default::default()
        };
        assert_eq!(
            check_end_repeat(Mode::Daily, &raw, &mut result),
            Some(Some(EndRepeat::OnRepeat(4)))
        );
    }

    #[test]
    fn maintenance_day_typo_suggests_token() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            maintenance_days: set(vec!["MONDAY".to_string(), "Tuesday".to_string()]),
            ..Default::default()
        };
        assert!(check_maintenance_days(&raw, &mut result).is_none());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "maintenance_days[1]");
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("TUESDAY"));
    }

    #[test]
    fn days_of_month_each_offender_reported() {
        let mut result = ValidationResult::new();
        assert!(check_days_of_month(&[0, 15, 32], &mut result).is_none());
        let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["frequency.days_of_month[0]", "frequency.days_of_month[2]"]);
    }

    #[test]
    fn late_days_warn() {
        let mut result = ValidationResult::new();
        let days = check_days_of_month(&[1, 31, 1], &mut result).unwrap();
        assert_eq!(days.as_slice(), &[1, 31]);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn days_of_week_requires_both_parts() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            frequency: set(RawFrequency {
                days_of_month: None,
                days_of_week: set(RawDaysOfWeek {
                    ordinal_day_of_month: set("FIFTH".to_string()),
                    week_day: None,
                }),
            }),
            ..Default::default()
        };
        assert!(check_frequency(&raw, &mut result).is_none());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].kind, ViolationKind::InvalidEnumValue);
        assert_eq!(result.errors[1].kind, ViolationKind::MissingField);
    }

    #[test]
    fn unknown_mode_gets_suggestion() {
        let mut result = ValidationResult::new();
        let raw = RawScheduleConfig {
            mode: set("WEEKLEY".to_string()),
            ..Default::default()
        };
        assert!(resolve_mode(&raw, &mut result).is_none());
        assert_eq!(result.errors[0].kind, ViolationKind::InvalidMode);
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("WEEKLY"));
    }
}
