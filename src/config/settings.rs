use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::SETTINGS_FILE_NAME;

/// Points at one settings file and disables the search
pub(crate) const SETTINGS_PATH_ENV: &str = "DAILYSHOT_CONFIG";

/// Optional TOML settings for things env vars don't carry well
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub(crate) prompts: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) retention_days: Option<u64>,
    #[serde(default)]
    pub(crate) notify_timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
}

impl Settings {
    /// First candidate that exists and parses wins. Parse failures are
    /// reported through `warnings` and the search continues.
    pub(crate) fn load(
        candidates: &[PathBuf],
        warnings: &mut Vec<String>,
    ) -> Option<(Self, PathBuf)> {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warnings.push(format!("Failed to read {}: {}", path.display(), e));
                    continue;
                }
            };
            match toml::from_str::<Settings>(&content) {
                Ok(settings) => return Some((settings, path.clone())),
                Err(e) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), e));
                }
            }
        }
        None
    }

    pub(crate) fn candidate_paths(project_dir: &Path, explicit: Option<&str>) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![PathBuf::from(path)];
        }

        let mut paths = vec![project_dir.join(SETTINGS_FILE_NAME)];

        // ~/.config/dailyshot/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("dailyshot").join("config.toml"));
        }

        // Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("dailyshot").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // ~/.dailyshot.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".dailyshot.toml"));
        }

        paths
    }
}
