//! Monitor downtime schedule engine.
//!
//! This crate provides:
//! - Naive timestamp, IANA time zone and weekday/ordinal parsing
//! - YAML-backed raw configuration with three-state (absent / null / value) reads
//! - Cross-field validation into an immutable [`DowntimeSchedule`], reporting
//!   every violation at once
//! - Create/update DTOs for the external downtime API
//! - Entity-tag read-back, an async API seam with an in-memory backend, and
//!   apply orchestration (create, edit in place, or replace on mode change)
//! - Filesystem loader for directories of downtime files

pub mod client;
pub mod datetime;
pub mod dto;
pub mod loader;
pub mod model;
pub mod schema;
pub mod tags;
pub mod timezone;
pub mod validation;
pub mod vocab;

pub use dto::{build, build_update, ExternalCreateInput, ExternalUpdateInput};
pub use model::DowntimeSchedule;
pub use schema::{Mode, RawScheduleConfig};
pub use validation::{validate, validate_report, validate_yaml, ValidationErrors, ViolationKind};
