//! Which calendar day "today" is.
//!
//! Prompt rotation keys on the day of year, so a run shortly after
//! midnight UTC lands on a different prompt depending on the zone. History
//! stamps and run log names use the same zone.

use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use super::date::day_of_year;
use crate::error::ConfigError;

/// Zone from `--timezone`, `DAILYSHOT_TZ` or the settings file
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timezone {
    /// The host's zone, which is what cron schedules against
    Local,
    Named(Tz),
}

impl Timezone {
    /// `local`, `utc`/`z` or an IANA name. Unset or blank means local.
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
        let raw = value.map(str::trim).unwrap_or_default();
        if raw.is_empty() || raw.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(raw)
            .map(Timezone::Named)
            .map_err(|_| ConfigError::InvalidTimezone {
                input: raw.to_string(),
            })
    }

    /// Wall-clock time in this zone at `utc`
    pub(crate) fn localize(self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = match self {
            Timezone::Local => utc.with_timezone(&Local).offset().fix(),
            Timezone::Named(tz) => utc.with_timezone(&tz).offset().fix(),
        };
        utc.with_timezone(&offset)
    }

    pub(crate) fn now(self) -> DateTime<FixedOffset> {
        self.localize(Utc::now())
    }

    /// Day of year (1-366) that picks the prompt for a run at `utc`
    pub(crate) fn rotation_day(self, utc: DateTime<Utc>) -> u32 {
        day_of_year(self.localize(utc).date_naive())
    }
}
