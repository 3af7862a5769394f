//! `KEY=VALUE` env file parsing
//!
//! Accepts the usual shell-sourced shape: blank lines and `#` comments are
//! skipped, an `export ` prefix is ignored, and one layer of matching quotes
//! around the value is removed.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub(crate) type EnvMap = BTreeMap<String, String>;

/// Parse env file content. The first definition of a key wins.
pub(crate) fn parse_env(content: &str) -> EnvMap {
    let mut vars = EnvMap::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.entry(key.to_string())
            .or_insert_with(|| unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Read and parse an env file. A missing file is `Ok(None)`.
pub(crate) fn load_env_file(path: &Path) -> std::io::Result<Option<EnvMap>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(parse_env(&String::from_utf8_lossy(&bytes)))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
