//! Per-run log files and their retention

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, FixedOffset};

use crate::consts::{LOG_FILE_EXT, LOG_FILE_PREFIX, LOG_STAMP_FORMAT};
use crate::error::AppError;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub(crate) fn retention_window(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECS_PER_DAY))
}

pub(crate) fn run_log_path(log_dir: &Path, at: DateTime<FixedOffset>) -> PathBuf {
    log_dir.join(format!(
        "{LOG_FILE_PREFIX}{}.{LOG_FILE_EXT}",
        at.format(LOG_STAMP_FORMAT)
    ))
}

/// Create the log directory and open this run's log file. Two runs in the
/// same second share the file.
pub(crate) fn open_run_log(
    log_dir: &Path,
    at: DateTime<FixedOffset>,
) -> Result<(PathBuf, File), AppError> {
    fs::create_dir_all(log_dir).map_err(|e| AppError::io("create", log_dir, e))?;
    let path = run_log_path(log_dir, at);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| AppError::io("open", &path, e))?;
    Ok((path, file))
}

#[derive(Debug, Default)]
pub(crate) struct RotationReport {
    pub(crate) removed: Vec<PathBuf>,
    pub(crate) failed: Vec<(PathBuf, String)>,
}

/// Delete `*.log` files in `log_dir` whose mtime is older than `max_age`.
/// Best effort: failures are collected, never raised.
pub(crate) fn rotate_logs(log_dir: &Path, max_age: Duration, now: SystemTime) -> RotationReport {
    let mut report = RotationReport::default();
    let Some(dir) = log_dir.to_str() else {
        report
            .failed
            .push((log_dir.to_path_buf(), "path is not valid UTF-8".to_string()));
        return report;
    };
    let pattern = format!("{}/*.{LOG_FILE_EXT}", glob::Pattern::escape(dir));
    let Ok(entries) = glob::glob(&pattern) else {
        return report;
    };

    for path in entries.flatten() {
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                report.failed.push((path, e.to_string()));
                continue;
            }
        };
        // Files stamped in the future have no age yet
        let Ok(age) = now.duration_since(modified) else {
            continue;
        };
        if age <= max_age {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(e) => report.failed.push((path, e.to_string())),
        }
    }

    report
}
