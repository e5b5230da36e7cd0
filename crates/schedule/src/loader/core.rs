//! Core [`DowntimeLoader`] struct: filesystem-backed downtime loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::model::DowntimeSchedule;
use crate::schema::RawScheduleConfig;
use crate::validation::{validate_report, ValidationErrors, ValidationWarning};

use super::error::{LoadResult, LoadStatus, Result};

/// A validated schedule plus the advisory warnings raised for it.
#[derive(Debug, Clone)]
pub struct LoadedDowntime {
    pub schedule: DowntimeSchedule,
    pub warnings: Vec<ValidationWarning>,
}

/// Filesystem-backed downtime loader.
///
/// Maintains an in-memory map of valid schedules keyed by file stem, so
/// `patch-tuesday.yml` is held as `patch-tuesday`.
pub struct DowntimeLoader {
    /// Root directory containing downtime YAML files.
    dir: PathBuf,
    schedules: Arc<RwLock<HashMap<String, DowntimeSchedule>>>,
}

impl DowntimeLoader {
    /// Create a loader for `dir`. The directory is not created; a missing
    /// directory simply loads nothing.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            schedules: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Recursively scan the directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse and validation errors
    /// are reported per-file but do not abort the scan.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        self.scan_dir_recursive(&self.dir, &mut results)?;
        info!(
            path = %self.dir.display(),
            loaded = results.iter().filter(|r| matches!(r.status, LoadStatus::Loaded { .. })).count(),
            failed = results.iter().filter(|r| r.is_failed()).count(),
            "downtime scan complete"
        );
        Ok(results)
    }

    fn scan_dir_recursive(&self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        // Sorted for a stable report order.
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            if !is_yaml(&path) {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let status = self.load_path(&path);
            results.push(LoadResult { path, status });
        }

        Ok(())
    }

    fn load_path(&self, path: &Path) -> LoadStatus {
        let id = downtime_id(path);
        match Self::load_file(path) {
            Ok(LoadedDowntime { schedule, warnings }) => {
                info!(id = %id, name = schedule.name(), mode = %schedule.mode(), "loaded downtime");
                for warning in &warnings {
                    debug!(id = %id, path = %warning.path, "{}", warning.message);
                }
                let mode = schedule.mode();
                self.schedules
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(id.clone(), schedule);
                LoadStatus::Loaded { id, mode, warnings }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load downtime file");
                LoadStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Parse and validate a single downtime file.
    pub fn load_file(path: &Path) -> Result<LoadedDowntime> {
        let contents = fs::read_to_string(path)?;
        let raw = RawScheduleConfig::from_yaml(&contents)?;
        let report = validate_report(&raw);
        match report.schedule {
            Some(schedule) => Ok(LoadedDowntime {
                schedule,
                warnings: report.result.warnings,
            }),
            None => Err(ValidationErrors(report.result.errors).into()),
        }
    }

    /// Get the downtime directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A loaded schedule by id (file stem).
    pub fn get(&self, id: &str) -> Option<DowntimeSchedule> {
        self.schedules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Get the shared schedules map.
    pub fn schedules(&self) -> Arc<RwLock<HashMap<String, DowntimeSchedule>>> {
        Arc::clone(&self.schedules)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "yml" || e == "yaml")
}

fn downtime_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
