use std::fs::File;
use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::AppError;

/// Overrides the console filter with a full `EnvFilter` directive
pub(crate) const LOG_FILTER_ENV: &str = "DAILYSHOT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogLevel {
    Quiet,
    Normal,
    Debug,
}

impl LogLevel {
    pub(crate) fn from_flags(quiet: bool, debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else if quiet {
            LogLevel::Quiet
        } else {
            LogLevel::Normal
        }
    }

    fn console_directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "warn",
            LogLevel::Normal => "info",
            LogLevel::Debug => "debug",
        }
    }

    // The run log is the durable record, so --quiet never thins it.
    fn file_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            _ => "info",
        }
    }
}

/// Install the global subscriber: stderr always, plus the per-run log file when given.
pub(crate) fn init_logging(level: LogLevel, run_log: Option<File>) -> Result<(), AppError> {
    let console_filter = std::env::var(LOG_FILTER_ENV)
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(level.console_directive()));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_filter(console_filter);

    let file = run_log.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(level.file_directive()))
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
