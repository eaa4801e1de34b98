// --- File: crates/salonsync_schedule/src/month.rs ---
//! Month heatmap: a Monday-first grid with per-day booking density.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use salonsync_common::models::Appointment;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// How busy a day is, from its appointment count.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Empty,
    Light,
    Moderate,
    Busy,
}

impl Density {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Density::Empty,
            1..=3 => Density::Light,
            4..=7 => Density::Moderate,
            _ => Density::Busy,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthDay {
    pub date: NaiveDate,
    pub day: u32,
    pub count: usize,
    pub density: Density,
    pub is_today: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Monday-first week.
    pub leading_blanks: u32,
    pub days: Vec<MonthDay>,
    pub previous_month: NaiveDate,
    pub next_month: NaiveDate,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MonthQuery {
    #[cfg_attr(feature = "openapi", schema(example = 2025))]
    pub year: Option<i32>,
    #[cfg_attr(feature = "openapi", schema(example = 5))]
    pub month: Option<u32>,
}

pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::DateParseError(format!("{}-{:02}", year, month)))
}

/// First day of the month `delta` months away from the month containing `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    let shifted = if delta >= 0 {
        first.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}

pub fn days_in_month(first: NaiveDate) -> u32 {
    let next = shift_month(first, 1);
    next.signed_duration_since(first).num_days() as u32
}

/// Appointments whose local time falls within `[00:00:00, 23:59:59]` of `date`.
pub fn count_for_day(appointments: &[Appointment], date: NaiveDate, tz: Tz) -> usize {
    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = date.and_hms_opt(23, 59, 59).unwrap_or(day_start);
    appointments
        .iter()
        .filter(|a| {
            let local = a.start_time.with_timezone(&tz).naive_local();
            local >= day_start && local <= day_end
        })
        .count()
}

pub fn month_view(
    appointments: &[Appointment],
    year: i32,
    month: u32,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<MonthView, ScheduleError> {
    let first = first_of_month(year, month)?;
    let today = now.with_timezone(&tz).date_naive();

    let days = first
        .iter_days()
        .take(days_in_month(first) as usize)
        .map(|date| {
            let count = count_for_day(appointments, date, tz);
            MonthDay {
                date,
                day: date.day(),
                count,
                density: Density::from_count(count),
                is_today: date == today,
            }
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
        previous_month: shift_month(first, -1),
        next_month: shift_month(first, 1),
    })
}
