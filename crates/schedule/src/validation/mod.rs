//! Cross-field validation of raw downtime configuration.
//!
//! The single authority on whether a [`RawScheduleConfig`] is acceptable and
//! the only place mode-dependent legality is encoded. Every independent check
//! runs; violations are accumulated into a [`ValidationResult`] (errors block,
//! warnings are advisory) and returned together, each tagged with the
//! attribute path it concerns.

mod recurrence_checks;
mod window_checks;

pub mod fuzzy;


use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::DowntimeSchedule;
use crate::schema::RawScheduleConfig;

// ── Result types ────────────────────────────────────────────────────

/// Category of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    MalformedDateTime,
    MalformedDate,
    InvalidTimeRange,
    UnknownTimeZone,
    InvalidMode,
    MissingField,
    UnexpectedField,
    ExclusivityViolation,
    InvalidEnumValue,
    OutOfRange,
    /// The document could not be decoded at all.
    MalformedConfig,
}

/// Overall validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ViolationKind,
    /// Attribute path, e.g. `"frequency.days_of_month[2]"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(
        &mut self,
        kind: ViolationKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            kind,
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        kind: ViolationKind,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            kind,
            path: path.into(),
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Every violation found in one pass, rendered as a numbered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.0.iter().map(|e| e.kind).collect()
    }

    /// True if some violation has this kind and path.
    pub fn contains(&self, kind: ViolationKind, path: &str) -> bool {
        self.0.iter().any(|e| e.kind == kind && e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "the following validation errors have been identified:")?;
        for (index, error) in self.0.iter().enumerate() {
            writeln!(f, "({}): {}", index + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Full outcome of one validation pass: the schedule when valid, plus every
/// error and warning found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub schedule: Option<DowntimeSchedule>,
    pub result: ValidationResult,
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a raw configuration into a [`DowntimeSchedule`], or return every
/// violation found.
pub fn validate(raw: &RawScheduleConfig) -> Result<DowntimeSchedule, ValidationErrors> {
    let report = validate_report(raw);
    for warning in &report.result.warnings {
        debug!(path = %warning.path, "{}", warning.message);
    }
    match report.schedule {
        Some(schedule) => Ok(schedule),
        None => Err(ValidationErrors(report.result.errors)),
    }
}

/// Run all checks, keeping warnings alongside the outcome.
pub fn validate_report(raw: &RawScheduleConfig) -> ValidationReport {
    let mut result = ValidationResult::new();

    let mode = recurrence_checks::resolve_mode(raw, &mut result);
    let name = window_checks::check_name(raw, &mut result);
    let monitor_guids = window_checks::check_monitor_guids(raw, &mut result);
    let window = window_checks::check_window(raw, &mut result);
    let time_zone = window_checks::check_time_zone(raw, &mut result);
    // Mode-dependent block checks only make sense once the mode is known.
    let recurrence =
        mode.and_then(|mode| recurrence_checks::check_recurrence(mode, raw, &mut result));

    let schedule = match (name, window, time_zone, recurrence) {
        (Some(name), Some(window), Some(time_zone), Some(recurrence)) if result.valid => Some(
            DowntimeSchedule::new(name, monitor_guids, window, time_zone, recurrence),
        ),
        _ => None,
    };

    ValidationReport { schedule, result }
}

/// Parse raw YAML and validate. Decode failures become a `MalformedConfig` error.
pub fn validate_yaml(yaml: &str) -> ValidationReport {
    match RawScheduleConfig::from_yaml(yaml) {
        Ok(raw) => validate_report(&raw),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error(
                ViolationKind::MalformedConfig,
                "",
                format!("YAML parse error: {e}"),
            );
            ValidationReport {
                schedule: None,
                result,
            }
        }
    }
}

/// Shared message for a token outside a closed vocabulary.
pub(crate) fn invalid_token(
    result: &mut ValidationResult,
    kind: ViolationKind,
    path: &str,
    token: &str,
    accepted: &[&str],
) {
    let suggestion = fuzzy::fuzzy_match(token, accepted);
    result.error_with_suggestion(
        kind,
        path,
        format!(
            "'{}' is not an accepted value; expected one of [{}]",
            token,
            accepted.join(", ")
        ),
        suggestion,
    );
}
