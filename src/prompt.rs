//! Daily prompt rotation
//!
//! The prompt for a given day is `catalog[day_of_year % len]`, so the
//! rotation wraps over year ends and leap days without special cases.

use serde::Serialize;

use crate::consts::DEFAULT_PROMPTS;
use crate::error::ConfigError;

/// Ordered, non-empty list of prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PromptCatalog {
    prompts: Vec<String>,
}

/// Result of picking the prompt for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Selection<'a> {
    pub(crate) day: u32,
    pub(crate) index: usize,
    pub(crate) prompt: &'a str,
}

impl PromptCatalog {
    /// Blank entries are dropped; nothing left is a configuration error.
    pub(crate) fn new(prompts: Vec<String>) -> Result<Self, ConfigError> {
        let prompts: Vec<String> = prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if prompts.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { prompts })
    }

    pub(crate) fn builtin() -> Self {
        Self {
            prompts: DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.prompts.len()
    }

    pub(crate) fn index_for_day(&self, day: u32) -> usize {
        day as usize % self.len()
    }

    pub(crate) fn select(&self, day: u32) -> Selection<'_> {
        let index = self.index_for_day(day);
        Selection {
            day,
            index,
            prompt: &self.prompts[index],
        }
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
