//! Filesystem loader for downtime configuration files.
//!
//! Scans a directory recursively for `*.yml` / `*.yaml` files, validates
//! each one and keeps the valid schedules in memory keyed by file stem.
//! Broken files are reported per-file and never abort the scan.

mod core;
mod error;


pub use self::core::{DowntimeLoader, LoadedDowntime};
pub use self::error::{LoadError, LoadResult, LoadStatus, Result};
