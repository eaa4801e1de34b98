// --- File: crates/salonsync_schedule/src/dashboard.rs ---
//! Today's numbers for the landing screen.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use salonsync_common::models::{Appointment, Client, Language, Service};
use serde::{Deserialize, Serialize};

use crate::calendar::{appointments_on, display_name};
use crate::catalog::find_service;
use crate::time::local_hhmm;

/// Service label on the dashboard card when none is known.
pub const UPCOMING_FALLBACK_LABEL: &str = "Appointment";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAppointment {
    pub appointment_id: String,
    pub client_name: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    pub start_label: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date: NaiveDate,
    pub today_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_appointment: Option<UpcomingAppointment>,
}

fn upcoming_entry(
    appointment: &Appointment,
    clients: &[Client],
    services: &[Service],
    language: Language,
    tz: Tz,
) -> UpcomingAppointment {
    UpcomingAppointment {
        appointment_id: appointment.id.clone(),
        client_name: display_name(appointment, clients, language),
        service_name: find_service(services, appointment.service_id.as_deref())
            .map(|s| s.name.clone())
            .unwrap_or_else(|| UPCOMING_FALLBACK_LABEL.to_string()),
        start_time: appointment.start_time,
        start_label: local_hhmm(appointment.start_time, tz),
    }
}

pub fn dashboard(
    appointments: &[Appointment],
    clients: &[Client],
    services: &[Service],
    language: Language,
    now: DateTime<Utc>,
    tz: Tz,
) -> Dashboard {
    let today = now.with_timezone(&tz).date_naive();
    let todays: Vec<&Appointment> = appointments_on(appointments, today, tz).collect();

    let next_appointment = todays
        .iter()
        .filter(|a| a.start_time > now)
        .min_by_key(|a| a.start_time)
        .map(|a| upcoming_entry(a, clients, services, language, tz));

    Dashboard {
        date: today,
        today_count: todays.len(),
        next_appointment,
    }
}

fn earliest<'a>(
    appointments: impl Iterator<Item = &'a Appointment>,
    limit: usize,
) -> Vec<&'a Appointment> {
    let mut selected: Vec<&Appointment> = appointments.collect();
    selected.sort_by_key(|a| a.start_time);
    selected.truncate(limit);
    selected
}

/// Appointments starting at or after `now`, earliest first. Feeds the
/// schedule analysis.
pub fn upcoming_appointments<'a>(
    appointments: &'a [Appointment],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&'a Appointment> {
    earliest(appointments.iter().filter(|a| a.start_time >= now), limit)
}

/// The assistant's "next up" list across all days.
pub fn upcoming(
    appointments: &[Appointment],
    clients: &[Client],
    services: &[Service],
    language: Language,
    now: DateTime<Utc>,
    tz: Tz,
    limit: usize,
) -> Vec<UpcomingAppointment> {
    // Strictly after now, like the dashboard card.
    earliest(appointments.iter().filter(|a| a.start_time > now), limit)
        .into_iter()
        .map(|a| upcoming_entry(a, clients, services, language, tz))
        .collect()
}
