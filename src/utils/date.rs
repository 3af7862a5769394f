use chrono::{Datelike, NaiveDate};

use crate::error::ConfigError;

/// 1-based ordinal day, 1..=366
pub(crate) fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

pub(crate) fn validate_day(day: u32) -> Result<u32, ConfigError> {
    if (1..=366).contains(&day) {
        Ok(day)
    } else {
        Err(ConfigError::InvalidDay { input: day })
    }
}
