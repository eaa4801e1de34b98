// --- File: crates/salonsync_schedule/src/calendar.rs ---
//! Day view: the slot grid and the positioned appointment blocks.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use salonsync_common::i18n::GENERAL_SERVICE_LABEL;
use salonsync_common::models::{AppSettings, Appointment, Client, Language, Service};
use serde::{Deserialize, Serialize};

use crate::catalog::{appointment_duration, find_service, NEUTRAL_COLOR};
use crate::time::{local_date, local_hhmm, slot_instant};

/// Vertical scale of the day grid.
pub const PIXELS_PER_MINUTE: f64 = 1.6;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// `HH:MM`
    pub time: String,
    pub hour: u32,
    pub minute: u32,
    pub top: f64,
    /// Booking prefill instant for this slot on the viewed date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBlock {
    pub appointment_id: String,
    pub client_name: String,
    pub service_label: String,
    pub color: String,
    /// Local `HH:MM`.
    pub start_label: String,
    pub start_time: DateTime<Utc>,
    pub duration: u32,
    pub top: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub is_today: bool,
    pub previous_day: NaiveDate,
    pub next_day: NaiveDate,
    pub business_start_hour: u32,
    pub business_end_hour: u32,
    pub grid_height: f64,
    pub slots: Vec<TimeSlot>,
    pub blocks: Vec<AppointmentBlock>,
    /// Offset of the current-time line; only present for today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now_offset: Option<f64>,
}

/// Slot labels: every hour from start to end, plus the half hour except after the last.
pub fn time_slots(start_hour: u32, end_hour: u32) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for hour in start_hour..=end_hour {
        slots.push(slot(hour, 0, start_hour));
        if hour != end_hour {
            slots.push(slot(hour, 30, start_hour));
        }
    }
    slots
}

fn slot(hour: u32, minute: u32, start_hour: u32) -> TimeSlot {
    TimeSlot {
        time: format!("{:02}:{:02}", hour, minute),
        hour,
        minute,
        top: minute_offset(hour, minute, start_hour),
        start_time: None,
    }
}

pub fn grid_height(start_hour: u32, end_hour: u32) -> f64 {
    (end_hour as f64 - start_hour as f64 + 1.0) * 60.0 * PIXELS_PER_MINUTE
}

/// Pixel offset of `hour:minute` from the top of the grid. Negative before opening.
pub fn minute_offset(hour: u32, minute: u32, start_hour: u32) -> f64 {
    ((hour as f64 - start_hour as f64) * 60.0 + minute as f64) * PIXELS_PER_MINUTE
}

/// Name shown on a block: the appointment's own name, the registered client's, or "guest".
pub fn display_name(appointment: &Appointment, clients: &[Client], language: Language) -> String {
    appointment
        .client_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            clients
                .iter()
                .find(|c| c.id == appointment.client_id)
                .map(|c| c.name.as_str())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| language.guest_name())
        .to_string()
}

pub fn appointments_on(
    appointments: &[Appointment],
    date: NaiveDate,
    tz: Tz,
) -> impl Iterator<Item = &Appointment> {
    appointments
        .iter()
        .filter(move |a| local_date(a.start_time, tz) == date)
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

pub fn day_view(
    appointments: &[Appointment],
    clients: &[Client],
    services: &[Service],
    settings: &AppSettings,
    date: NaiveDate,
    now: DateTime<Utc>,
    tz: Tz,
) -> DayView {
    let start_hour = settings.business_start_hour;
    let end_hour = settings.business_end_hour;

    let mut slots = time_slots(start_hour, end_hour);
    for slot in &mut slots {
        // Slots in a DST gap simply carry no prefill instant
        slot.start_time = slot_instant(date, slot.hour, slot.minute, tz).ok();
    }

    let mut blocks: Vec<AppointmentBlock> = appointments_on(appointments, date, tz)
        .map(|appointment| {
            let local = appointment.start_time.with_timezone(&tz);
            let service = find_service(services, appointment.service_id.as_deref());
            let duration = appointment_duration(appointment, services, settings.default_duration);
            AppointmentBlock {
                appointment_id: appointment.id.clone(),
                client_name: display_name(appointment, clients, settings.language),
                service_label: service
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| GENERAL_SERVICE_LABEL.to_string()),
                color: service
                    .map(|s| s.color.clone())
                    .unwrap_or_else(|| NEUTRAL_COLOR.to_string()),
                start_label: local_hhmm(appointment.start_time, tz),
                start_time: appointment.start_time,
                duration,
                top: minute_offset(local.hour(), local.minute(), start_hour),
                height: duration as f64 * PIXELS_PER_MINUTE,
                notes: appointment.notes.clone(),
            }
        })
        .collect();
    blocks.sort_by_key(|b| b.start_time);

    let now_local = now.with_timezone(&tz);
    let is_today = now_local.date_naive() == date;
    let now_offset =
        is_today.then(|| minute_offset(now_local.hour(), now_local.minute(), start_hour));

    DayView {
        date,
        is_today,
        previous_day: previous_day(date),
        next_day: next_day(date),
        business_start_hour: start_hour,
        business_end_hour: end_hour,
        grid_height: grid_height(start_hour, end_hour),
        slots,
        blocks,
        now_offset,
    }
}

