//! Run bookkeeping: output logging, failure diagnostics, history and log
//! retention.

pub(crate) mod history;
pub(crate) mod retention;

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset};

use crate::error::AppError;
use crate::generator::{RunOutcome, error_lines};

pub(crate) use history::{HistoryRecord, append_record, read_history};
pub(crate) use retention::{RotationReport, open_run_log, retention_window, rotate_logs};

/// What happened to the history file for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HistoryUpdate {
    Appended(HistoryRecord),
    /// Successful run without a public URL
    Private,
    /// Failed runs never reach the history
    Failed,
}

pub(crate) struct Recorder<'a> {
    history_file: &'a Path,
    log_dir: &'a Path,
    retention_days: u64,
}

impl<'a> Recorder<'a> {
    pub(crate) fn new(history_file: &'a Path, log_dir: &'a Path, retention_days: u64) -> Self {
        Self {
            history_file,
            log_dir,
            retention_days,
        }
    }

    pub(crate) fn record(
        &self,
        outcome: &RunOutcome,
        prompt: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<HistoryUpdate, AppError> {
        if !outcome.succeeded() {
            self.log_failure(outcome);
            return Ok(HistoryUpdate::Failed);
        }

        log_output(outcome, false);
        let fields = &outcome.fields;
        if let Some(uri) = &fields.storage_uri {
            tracing::info!("Stored at {uri}");
        }
        // A missing public URL has its own message below
        for field in fields.missing().into_iter().filter(|f| *f != "public URL") {
            tracing::warn!("Generator output had no {field}");
        }

        let Some(url) = fields.public_url.as_deref() else {
            tracing::warn!("No public URL in generator output, image presumed private");
            return Ok(HistoryUpdate::Private);
        };

        let record = HistoryRecord::new(at, url, prompt);
        append_record(self.history_file, &record)?;
        tracing::info!(
            "Public URL: {url} (recorded in {})",
            self.history_file.display()
        );
        Ok(HistoryUpdate::Appended(record))
    }

    fn log_failure(&self, outcome: &RunOutcome) {
        tracing::error!("Generator failed with exit code {}", outcome.exit_code);
        log_output(outcome, true);
        let diagnostics = error_lines(&outcome.raw_output);
        if diagnostics.is_empty() {
            tracing::error!("No error lines found in generator output");
        }
        for line in diagnostics {
            tracing::error!("diagnostic: {line}");
        }
    }

    /// Apply log retention. Problems are logged, never raised.
    pub(crate) fn rotate(&self, now: SystemTime) -> RotationReport {
        let report = rotate_logs(self.log_dir, retention_window(self.retention_days), now);
        for path in &report.removed {
            tracing::debug!("Removed old log {}", path.display());
        }
        for (path, reason) in &report.failed {
            tracing::warn!("Could not remove {}: {reason}", path.display());
        }
        if !report.removed.is_empty() {
            tracing::info!(
                "Removed {} log file(s) older than {} days",
                report.removed.len(),
                self.retention_days
            );
        }
        report
    }
}

fn log_output(outcome: &RunOutcome, failed: bool) {
    for line in outcome.raw_output.lines() {
        if failed {
            tracing::error!(target: "generator", "| {line}");
        } else {
            tracing::info!(target: "generator", "| {line}");
        }
    }
}
