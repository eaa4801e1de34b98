use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use salonsync_common::error::{not_found, unavailable, SalonSyncError};
use salonsync_common::i18n::DEFAULT_SERVICE_NAME;
use salonsync_common::models::{Appointment, Language};
use salonsync_schedule::calendar::display_name;
use salonsync_schedule::catalog::find_service;
use salonsync_schedule::dashboard::upcoming_appointments;
use salonsync_schedule::ScheduleState;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::text::GeminiTextClient;
use crate::wake_word::{decide, WakeDecision, WakeRequest, WakeWordConfig};

/// How many upcoming appointments the schedule analysis looks at.
pub const SUMMARY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AssistantState {
    pub schedule: Arc<ScheduleState>,
    /// `None` when Gemini is switched off or has no key.
    pub text: Option<Arc<GeminiTextClient>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssistantMessage {
    pub message: String,
}

impl AssistantState {
    fn text_client(&self) -> Result<&GeminiTextClient, SalonSyncError> {
        self.text
            .as_deref()
            .ok_or_else(|| unavailable("Gemini is not configured"))
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/assistant/reminder/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Reminder SMS text, or a fallback message", body = AssistantMessage),
        (status = 404, description = "Unknown appointment"),
        (status = 503, description = "Gemini not configured")
    ),
    tag = "Assistant"
))]
pub async fn reminder_handler(
    State(state): State<Arc<AssistantState>>,
    Path(id): Path<String>,
) -> Result<Json<AssistantMessage>, SalonSyncError> {
    let client = state.text_client()?;
    let schedule = &state.schedule;
    let appointments = schedule.store.appointments().snapshot();
    let appointment: &Appointment = appointments
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| not_found(format!("Appointment {}", id)))?;

    let clients = schedule.store.clients().snapshot();
    // The prompt is Hungarian, so is the guest fallback.
    let client_name = display_name(appointment, &clients, Language::Hu);
    let services = schedule.services();
    let service_name = find_service(&services, appointment.service_id.as_deref())
        .map(|s| s.name.as_str())
        .unwrap_or(DEFAULT_SERVICE_NAME);

    info!(appointment_id = %id, "Generating reminder");
    let message = client
        .generate_client_message(
            &client_name,
            appointment.start_time,
            service_name,
            schedule.time_zone,
        )
        .await;
    Ok(Json(AssistantMessage { message }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/assistant/summary",
    responses(
        (status = 200, description = "Markdown tips about the upcoming schedule", body = AssistantMessage),
        (status = 503, description = "Gemini not configured")
    ),
    tag = "Assistant"
))]
pub async fn summary_handler(
    State(state): State<Arc<AssistantState>>,
) -> Result<Json<AssistantMessage>, SalonSyncError> {
    let client = state.text_client()?;
    let schedule = &state.schedule;
    let appointments = schedule.store.appointments().snapshot();
    let selected: Vec<Appointment> =
        upcoming_appointments(&appointments, Utc::now(), SUMMARY_LIMIT)
            .into_iter()
            .cloned()
            .collect();

    let message = client
        .analyze_schedule(&selected, &schedule.services(), schedule.time_zone)
        .await;
    Ok(Json(AssistantMessage { message }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/voice/wake-word",
    responses((status = 200, description = "Wake word recognizer setup", body = WakeWordConfig)),
    tag = "Assistant"
))]
pub async fn wake_word_config_handler(
    State(state): State<Arc<AssistantState>>,
) -> Json<WakeWordConfig> {
    Json(WakeWordConfig::from_settings(&state.schedule.settings.get()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/voice/wake",
    request_body = WakeRequest,
    responses((status = 200, description = "Whether to open a voice session", body = WakeDecision)),
    tag = "Assistant"
))]
pub async fn wake_handler(
    State(state): State<Arc<AssistantState>>,
    Json(request): Json<WakeRequest>,
) -> Json<WakeDecision> {
    Json(decide(&state.schedule.settings.get(), &request.transcript))
}
