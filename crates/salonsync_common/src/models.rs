// --- File: crates/salonsync_common/src/models.rs ---

// Domain records shared by the store, the calendar views and the voice tools.
// JSON field names follow the camelCase layout of the stored documents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{validation_error, SalonSyncError};

/// Duration used when an appointment references no known service.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Placeholder client id for bookings made without a registered client.
pub const TEMP_CLIENT_ID: &str = "temp";

/// Client id written by the voice assistant's booking tool.
pub const VOICE_CLIENT_ID: &str = "voice_generated";

/// Note attached to appointments booked by the voice assistant.
pub const VOICE_BOOKING_NOTE: &str = "AI Voice Booking";

/// A registered salon client.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for registering a client.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewClient {
    /// A client needs a non-blank name; the phone number may be empty.
    pub fn validate(&self) -> Result<(), SalonSyncError> {
        if self.name.trim().is_empty() {
            return Err(validation_error("Client name is required"));
        }
        Ok(())
    }

    pub fn into_client(self, id: String) -> Client {
        Client {
            id,
            name: self.name.trim().to_string(),
            phone: self.phone,
            notes: self.notes,
        }
    }
}

/// A booked appointment.
///
/// The duration is never stored. It comes from the referenced service at
/// render time, or [`DEFAULT_DURATION_MINUTES`] when there is none.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    /// A registered client id, or [`TEMP_CLIENT_ID`] / [`VOICE_CLIENT_ID`].
    pub client_id: String,
    /// Free-text name for clients that are not registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for creating an appointment. Conflicts are not rejected here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_client_id() -> String {
    TEMP_CLIENT_ID.to_string()
}

impl NewAppointment {
    /// The record the voice assistant writes for a spoken booking.
    pub fn voice_booking(name: &str, start_time: DateTime<Utc>) -> Self {
        Self {
            client_id: VOICE_CLIENT_ID.to_string(),
            client_name: Some(name.to_string()),
            service_id: None,
            start_time,
            notes: Some(VOICE_BOOKING_NOTE.to_string()),
        }
    }

    pub fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            client_id: self.client_id,
            client_name: self.client_name,
            service_id: self.service_id,
            start_time: self.start_time,
            notes: self.notes,
        }
    }
}

/// A partial update. Only the fields that are present get written.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self == &AppointmentPatch::default()
    }

    /// Stored field names touched by this patch, in document order.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.client_id.is_some() {
            paths.push("clientId");
        }
        if self.client_name.is_some() {
            paths.push("clientName");
        }
        if self.service_id.is_some() {
            paths.push("serviceId");
        }
        if self.start_time.is_some() {
            paths.push("startTime");
        }
        if self.notes.is_some() {
            paths.push("notes");
        }
        paths
    }

    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(client_id) = &self.client_id {
            appointment.client_id = client_id.clone();
        }
        if let Some(client_name) = &self.client_name {
            appointment.client_name = Some(client_name.clone());
        }
        if let Some(service_id) = &self.service_id {
            appointment.service_id = Some(service_id.clone());
        }
        if let Some(start_time) = self.start_time {
            appointment.start_time = start_time;
        }
        if let Some(notes) = &self.notes {
            appointment.notes = Some(notes.clone());
        }
    }
}

/// A bookable service from the fixed catalogs.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: u32,
    /// Whole currency units (HUF).
    pub price: u32,
    /// Colour tag used by the calendar blocks.
    pub color: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Hu,
    En,
    Ro,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    #[default]
    Women,
    Men,
    Unisex,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    #[default]
    Hair,
    Nails,
    Cosmetics,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Process-wide salon settings. Changing them never touches stored data.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub business_start_hour: u32,
    pub business_end_hour: u32,
    pub specialization: Specialization,
    pub profession: Profession,
    pub default_duration: u32,
    pub theme: Theme,
    pub wake_word_enabled: bool,
    /// Service id to duration in minutes. Zero means "use the catalog value".
    pub service_duration_overrides: HashMap<String, u32>,
    pub language: Language,
    pub onboarded: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            business_start_hour: 8,
            business_end_hour: 20,
            specialization: Specialization::Women,
            profession: Profession::Hair,
            default_duration: DEFAULT_DURATION_MINUTES,
            theme: Theme::Dark,
            wake_word_enabled: true,
            service_duration_overrides: HashMap::new(),
            language: Language::Hu,
            onboarded: false,
        }
    }
}
