//! Naive (zone-less) timestamp and date parsing.
//!
//! The platform pairs a naive timestamp with a separately declared zone, so
//! only the canonical `YYYY-MM-DDTHH:MM:SS` shape is accepted. Offsets, a
//! trailing `Z`, fractional seconds and epoch integers are all rejected.

use chrono::{NaiveDate, NaiveDateTime};

pub const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape templates: `d` is an ASCII digit, anything else must match literally.
const DATETIME_SHAPE: &[u8] = b"dddd-dd-ddTdd:dd:dd";
const DATE_SHAPE: &[u8] = b"dddd-dd-dd";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeError {
    #[error("'{0}' is not in the format 'YYYY-MM-DDTHH:MM:SS' (no offset or 'Z' suffix)")]
    Shape(String),

    #[error("'{0}' is not in the format 'YYYY-MM-DD'")]
    DateShape(String),

    #[error("'{value}' is not a real calendar value: {reason}")]
    Calendar { value: String, reason: String },
}

fn matches_shape(value: &str, shape: &[u8]) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == shape.len()
        && bytes.iter().zip(shape).all(|(&b, &s)| match s {
            b'd' => b.is_ascii_digit(),
            lit => b == lit,
        })
}

/// Parse a canonical naive timestamp such as `2024-01-01T10:00:00`.
pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime, DateTimeError> {
    if !matches_shape(value, DATETIME_SHAPE) {
        return Err(DateTimeError::Shape(value.to_string()));
    }
    NaiveDateTime::parse_from_str(value, NAIVE_DATETIME_FORMAT).map_err(|e| DateTimeError::Calendar {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a calendar date such as `2024-06-30` (used by `end_repeat.on_date`).
pub fn parse_naive_date(value: &str) -> Result<NaiveDate, DateTimeError> {
    if !matches_shape(value, DATE_SHAPE) {
        return Err(DateTimeError::DateShape(value.to_string()));
    }
    NaiveDate::parse_from_str(value, NAIVE_DATE_FORMAT).map_err(|e| DateTimeError::Calendar {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

pub fn format_naive_datetime(value: &NaiveDateTime) -> String {
    value.format(NAIVE_DATETIME_FORMAT).to_string()
}

pub fn format_naive_date(value: &NaiveDate) -> String {
    value.format(NAIVE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_canonical_form() {
        let dt = parse_naive_datetime("2024-01-01T10:00:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 0, 0));
    }

    #[test]
    fn rejects_zone_markers() {
        for input in [
            "2024-01-01T10:00:00Z",
            "2024-01-01T10:00:00+02:00",
            "2024-01-01T10:00:00.000",
            "1704103200",
            "2024-1-01T10:00:00",
            "2024-01-01 10:00:00",
            "",
        ] {
            assert!(
                matches!(parse_naive_datetime(input), Err(DateTimeError::Shape(_))),
                "{input} should be rejected by shape"
            );
        }
    }

    #[test]
    fn rejects_impossible_calendar_values() {
        assert!(matches!(
            parse_naive_datetime("2023-02-29T10:00:00"),
            Err(DateTimeError::Calendar { .. })
        ));
        assert!(parse_naive_datetime("2024-01-01T24:00:00").is_err());
        assert!(parse_naive_datetime("2024-13-01T00:00:00").is_err());
    }

    #[test]
    fn dates() {
        assert!(parse_naive_date("2024-02-29").is_ok());
        assert!(matches!(parse_naive_date("2024/02/29"), Err(DateTimeError::DateShape(_))));
        assert!(parse_naive_date("2024-02-30").is_err());
        assert!(parse_naive_date("2024-02-01T00:00:00").is_err());
    }

    #[test]
    fn format_is_inverse_of_parse() {
        let text = "2031-12-31T23:59:59";
        assert_eq!(format_naive_datetime(&parse_naive_datetime(text).unwrap()), text);
        assert_eq!(format_naive_date(&parse_naive_date("2031-12-31").unwrap()), "2031-12-31");
    }
}
