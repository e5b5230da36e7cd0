//! IANA time zone validation and naive-to-absolute resolution.
//!
//! The zone table is compiled into `chrono-tz`, so lookups never touch the
//! filesystem and need no initialization.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeZoneError {
    #[error("'{0}' is not a known IANA time zone")]
    Unknown(String),

    #[error("{local} does not exist in {zone} (skipped by a daylight-saving transition)")]
    NonexistentLocalTime { local: NaiveDateTime, zone: String },

    #[error("epoch milliseconds {0} are out of range")]
    EpochOutOfRange(i64),
}

/// Look up an IANA zone identifier such as `America/New_York`.
pub fn parse_time_zone(name: &str) -> Result<Tz, TimeZoneError> {
    name.parse::<Tz>()
        .map_err(|_| TimeZoneError::Unknown(name.to_string()))
}

pub fn is_valid_time_zone(name: &str) -> bool {
    parse_time_zone(name).is_ok()
}

/// All zone names known to the database, for suggestions.
pub fn known_time_zones() -> Vec<&'static str> {
    chrono_tz::TZ_VARIANTS.iter().map(|tz| tz.name()).collect()
}

/// Pair a naive timestamp with its zone. Ambiguous local times (clocks set
/// back) resolve to the earlier instant.
pub fn resolve_instant(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, TimeZoneError> {
    tz.from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| TimeZoneError::NonexistentLocalTime {
            local,
            zone: tz.name().to_string(),
        })
}

/// Project epoch milliseconds into wall-clock time in `tz`.
pub fn local_from_epoch_millis(millis: i64, tz: Tz) -> Result<NaiveDateTime, TimeZoneError> {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.naive_local())
        .ok_or(TimeZoneError::EpochOutOfRange(millis))
}
