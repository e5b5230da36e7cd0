//! Error types and load result structures for the downtime loader.

use std::path::PathBuf;

use crate::schema::Mode;
use crate::validation::{ValidationErrors, ValidationWarning};

/// Errors that can occur while loading downtime files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The file parsed but does not describe a legal schedule.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Outcome of loading a single downtime file.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was loaded.
    pub path: PathBuf,
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Schedule validated and is held by the loader under `id`.
    Loaded {
        id: String,
        mode: Mode,
        warnings: Vec<ValidationWarning>,
    },
    /// File was skipped (dotfile, non-YAML, etc.).
    Skipped { reason: String },
    /// Parse or validation error occurred.
    Failed { error: String },
}

impl LoadResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, LoadStatus::Failed { .. })
    }
}
