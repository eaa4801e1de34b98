// --- File: crates/salonsync_schedule/src/availability.rs ---
//! Advisory availability check.
//!
//! A candidate start time conflicts with any appointment whose start lies
//! strictly less than [`BUFFER_WINDOW_MINUTES`] away. Service durations are
//! not considered, so a long service that started earlier is not flagged.
//! Nothing rejects a conflicting write; callers only report the result.

use chrono::{DateTime, Duration, Utc};
use salonsync_common::models::Appointment;
use serde::{Deserialize, Serialize};

pub const BUFFER_WINDOW_MINUTES: i64 = 30;

pub const OCCUPIED_MESSAGE: &str = "Occupied / Foglalt";
pub const FREE_MESSAGE: &str = "Free / Szabad";

pub fn buffer_window() -> Duration {
    Duration::minutes(BUFFER_WINDOW_MINUTES)
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_appointment_id: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// RFC 3339 instant or salon-local `YYYY-MM-DDTHH:MM`
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00"))]
    pub at: String,
}

/// The first appointment starting within the buffer window of `candidate`.
pub fn find_conflict(
    appointments: &[Appointment],
    candidate: DateTime<Utc>,
) -> Option<&Appointment> {
    let window = buffer_window();
    appointments
        .iter()
        .find(|appointment| (appointment.start_time - candidate).abs() < window)
}

pub fn is_available(appointments: &[Appointment], candidate: DateTime<Utc>) -> bool {
    find_conflict(appointments, candidate).is_none()
}

pub fn check_availability(
    appointments: &[Appointment],
    candidate: DateTime<Utc>,
) -> AvailabilityResult {
    match find_conflict(appointments, candidate) {
        Some(conflict) => AvailabilityResult {
            available: false,
            conflicting_appointment_id: Some(conflict.id.clone()),
            message: OCCUPIED_MESSAGE.to_string(),
        },
        None => AvailabilityResult {
            available: true,
            conflicting_appointment_id: None,
            message: FREE_MESSAGE.to_string(),
        },
    }
}
