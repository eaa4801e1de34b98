// --- File: crates/salonsync_schedule/src/time.rs ---
//! Salon-local time helpers.
//!
//! Appointments are stored as UTC instants; every calendar computation
//! happens in the salon's configured time zone.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use salonsync_config::AppConfig;
use tracing::warn;

use crate::error::ScheduleError;

pub const DEFAULT_TIME_ZONE: Tz = Tz::Europe__Budapest;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// The configured salon time zone, or Europe/Budapest.
pub fn salon_time_zone(config: &AppConfig) -> Tz {
    match config.salon.time_zone.as_deref() {
        Some(name) => Tz::from_str(name).unwrap_or_else(|_| {
            warn!("Unknown time zone '{}', using {}", name, DEFAULT_TIME_ZONE);
            DEFAULT_TIME_ZONE
        }),
        None => DEFAULT_TIME_ZONE,
    }
}

/// Parses an RFC 3339 instant, or a naive date-time read in `tz`.
///
/// Accepted naive forms: `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD HH:MM[:SS]`.
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
pub fn parse_instant(input: &str, tz: Tz) -> Result<DateTime<Utc>, ScheduleError> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| ScheduleError::DateParseError(input.to_string()))?;
    local_to_utc(naive, tz)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ScheduleError::DateParseError(format!("{} (expected YYYY-MM-DD)", input)))
}

pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ScheduleError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ScheduleError::NonexistentLocalTime(naive.to_string()))
}

/// The instant of `hour:minute` on `date` in the salon time zone.
pub fn slot_instant(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    tz: Tz,
) -> Result<DateTime<Utc>, ScheduleError> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ScheduleError::TimeParseError(format!("{:02}:{:02}", hour, minute)))?;
    local_to_utc(date.and_time(time), tz)
}

pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// `HH:MM` in the salon time zone.
pub fn local_hhmm(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}
