//! Append-only history of published images
//!
//! One line per successful public run: `<timestamp> | <url> | <prompt>`.
//! Lines are only ever appended; nothing rewrites or deduplicates them.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::consts::HISTORY_TIME_FORMAT;
use crate::error::AppError;

const SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct HistoryRecord {
    pub(crate) timestamp: String,
    pub(crate) public_url: String,
    pub(crate) prompt: String,
}

impl HistoryRecord {
    pub(crate) fn new(at: DateTime<FixedOffset>, public_url: &str, prompt: &str) -> Self {
        Self {
            timestamp: at.format(HISTORY_TIME_FORMAT).to_string(),
            public_url: public_url.to_string(),
            prompt: prompt.to_string(),
        }
    }

    pub(crate) fn to_line(&self) -> String {
        // A stray newline would split the record in two
        let prompt = self.prompt.replace(['\r', '\n'], " ");
        format!("{}{SEPARATOR}{}{SEPARATOR}{}", self.timestamp, self.public_url, prompt)
    }

    pub(crate) fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.trim_end().splitn(3, SEPARATOR);
        let timestamp = parts.next()?.trim();
        let public_url = parts.next()?.trim();
        let prompt = parts.next()?.trim();
        if timestamp.is_empty() || public_url.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: timestamp.to_string(),
            public_url: public_url.to_string(),
            prompt: prompt.to_string(),
        })
    }
}

pub(crate) fn append_record(path: &Path, record: &HistoryRecord) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| AppError::io("create", parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::io("open", path, e))?;
    // One write per line so concurrent runs can't interleave partial lines
    let line = format!("{}\n", record.to_line());
    file.write_all(line.as_bytes())
        .map_err(|e| AppError::io("append to", path, e))
}

/// Parsed history in file order. Unparseable lines are skipped; a missing
/// file is an empty history.
pub(crate) fn read_history(path: &Path) -> Result<Vec<HistoryRecord>, AppError> {
    let content = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::io("read", path, e)),
    };
    Ok(content.lines().filter_map(HistoryRecord::parse_line).collect())
}
