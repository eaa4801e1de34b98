// File: crates/salonsync_schedule/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use salonsync_common::error::{validation_error, SalonSyncError};
use salonsync_common::i18n::SAVE_FAILED;
use salonsync_common::models::{
    AppSettings, Appointment, AppointmentPatch, Client, NewAppointment, NewClient, Service,
};
use salonsync_common::services::AppointmentStore;
use serde::Deserialize;
use tracing::{error, info};

use crate::availability::{check_availability, AvailabilityQuery, AvailabilityResult};
use crate::calendar::{day_view, DayView};
use crate::catalog::services_for;
use crate::dashboard::{dashboard, upcoming, Dashboard, UpcomingAppointment};
use crate::month::{month_view, MonthQuery, MonthView};
use crate::settings::SettingsHandle;
use crate::time::{parse_date, parse_instant};

// Shared state for the booking and calendar handlers
#[derive(Clone)]
pub struct ScheduleState {
    pub settings: SettingsHandle,
    pub store: Arc<dyn AppointmentStore>,
    pub time_zone: Tz,
}

impl ScheduleState {
    pub fn new(settings: SettingsHandle, store: Arc<dyn AppointmentStore>, time_zone: Tz) -> Self {
        Self {
            settings,
            store,
            time_zone,
        }
    }

    /// Services under the current settings, overrides applied.
    pub fn services(&self) -> Vec<Service> {
        services_for(&self.settings.get())
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DayQuery {
    /// Date in YYYY-MM-DD format; defaults to today
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-15"))]
    pub date: Option<String>,
}

/// Default length of the upcoming list
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct UpcomingQuery {
    /// Number of appointments to return; defaults to 5
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ClientSearchQuery {
    /// Matches names case-insensitively, phone numbers verbatim
    pub q: Option<String>,
}

/// Whether a client matches a search term: name contains it ignoring case,
/// or phone contains it as typed. A blank term matches everyone.
pub fn client_matches(client: &Client, term: &str) -> bool {
    let term = term.trim();
    term.is_empty()
        || client.name.to_lowercase().contains(&term.to_lowercase())
        || client.phone.contains(term)
}

// Writes that fail for any reason but bad input collapse into one generic message.
fn save_error(context: &str, err: SalonSyncError) -> SalonSyncError {
    match err {
        SalonSyncError::ValidationError(_) | SalonSyncError::NotFoundError(_) => err,
        other => {
            error!("{}: {}", context, other);
            SalonSyncError::StoreError(SAVE_FAILED.to_string())
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/settings",
    responses((status = 200, description = "Current salon settings", body = AppSettings)),
    tag = "Schedule"
))]
pub async fn get_settings_handler(State(state): State<Arc<ScheduleState>>) -> Json<AppSettings> {
    Json(state.settings.get())
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/settings",
    request_body = AppSettings,
    responses(
        (status = 200, description = "Settings replaced", body = AppSettings),
        (status = 400, description = "Invalid business hours or duration")
    ),
    tag = "Schedule"
))]
pub async fn update_settings_handler(
    State(state): State<Arc<ScheduleState>>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, SalonSyncError> {
    let updated = state.settings.replace(settings)?;
    Ok(Json(updated))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/services",
    responses((status = 200, description = "Bookable services", body = [Service])),
    tag = "Schedule"
))]
pub async fn get_services_handler(State(state): State<Arc<ScheduleState>>) -> Json<Vec<Service>> {
    Json(state.services())
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Slot grid and appointment blocks", body = DayView),
        (status = 400, description = "Invalid date format")
    ),
    tag = "Schedule"
))]
pub async fn get_day_view_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayView>, SalonSyncError> {
    let now = Utc::now();
    let date = match query.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => now.with_timezone(&state.time_zone).date_naive(),
    };
    let settings = state.settings.get();
    let services = services_for(&settings);
    let appointments = state.store.appointments().snapshot();
    let clients = state.store.clients().snapshot();

    Ok(Json(day_view(
        &appointments,
        &clients,
        &services,
        &settings,
        date,
        now,
        state.time_zone,
    )))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/month",
    params(MonthQuery),
    responses(
        (status = 200, description = "Month heatmap", body = MonthView),
        (status = 400, description = "Invalid year or month")
    ),
    tag = "Schedule"
))]
pub async fn get_month_view_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthView>, SalonSyncError> {
    let now = Utc::now();
    let today = now.with_timezone(&state.time_zone).date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let appointments = state.store.appointments().snapshot();

    let view = month_view(&appointments, year, month, now, state.time_zone)?;
    Ok(Json(view))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "Today's count and next appointment", body = Dashboard)),
    tag = "Schedule"
))]
pub async fn get_dashboard_handler(State(state): State<Arc<ScheduleState>>) -> Json<Dashboard> {
    let settings = state.settings.get();
    let services = services_for(&settings);
    let appointments = state.store.appointments().snapshot();
    let clients = state.store.clients().snapshot();

    Json(dashboard(
        &appointments,
        &clients,
        &services,
        settings.language,
        Utc::now(),
        state.time_zone,
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/upcoming",
    params(UpcomingQuery),
    responses((status = 200, description = "Next appointments across all days", body = [UpcomingAppointment])),
    tag = "Schedule"
))]
pub async fn get_upcoming_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<UpcomingQuery>,
) -> Json<Vec<UpcomingAppointment>> {
    let settings = state.settings.get();
    let services = services_for(&settings);
    let appointments = state.store.appointments().snapshot();
    let clients = state.store.clients().snapshot();

    Json(upcoming(
        &appointments,
        &clients,
        &services,
        settings.language,
        Utc::now(),
        state.time_zone,
        query.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT),
    ))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Whether the start time is free", body = AvailabilityResult),
        (status = 400, description = "Unparseable date")
    ),
    tag = "Schedule"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResult>, SalonSyncError> {
    let candidate = parse_instant(&query.at, state.time_zone)?;
    let appointments = state.store.appointments().snapshot();
    Ok(Json(check_availability(&appointments, candidate)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments",
    responses((status = 200, description = "All appointments", body = [Appointment])),
    tag = "Schedule"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<ScheduleState>>,
) -> Json<Vec<Appointment>> {
    let mut appointments = state.store.appointments().snapshot().as_ref().clone();
    appointments.sort_by_key(|a| a.start_time);
    Json(appointments)
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 500, description = "Save failed")
    ),
    tag = "Schedule"
))]
pub async fn create_appointment_handler(
    State(state): State<Arc<ScheduleState>>,
    Json(appointment): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), SalonSyncError> {
    let created = state
        .store
        .add_appointment(appointment)
        .await
        .map_err(|e| save_error("Failed to add appointment", e))?;
    info!(appointment_id = %created.id, "Appointment booked");
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = AppointmentPatch,
    responses(
        (status = 204, description = "Appointment updated"),
        (status = 400, description = "Empty update"),
        (status = 404, description = "Unknown appointment"),
        (status = 500, description = "Save failed")
    ),
    tag = "Schedule"
))]
pub async fn update_appointment_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<StatusCode, SalonSyncError> {
    if patch.is_empty() {
        return Err(validation_error("Nothing to update"));
    }
    state
        .store
        .update_appointment(&id, patch)
        .await
        .map_err(|e| save_error("Failed to update appointment", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 500, description = "Delete failed")
    ),
    tag = "Schedule"
))]
pub async fn delete_appointment_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, SalonSyncError> {
    state
        .store
        .delete_appointment(&id)
        .await
        .map_err(|e| save_error("Failed to delete appointment", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/clients",
    params(ClientSearchQuery),
    responses((status = 200, description = "Registered clients", body = [Client])),
    tag = "Schedule"
))]
pub async fn list_clients_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<ClientSearchQuery>,
) -> Json<Vec<Client>> {
    let term = query.q.unwrap_or_default();
    let mut clients: Vec<Client> = state
        .store
        .clients()
        .snapshot()
        .iter()
        .filter(|c| client_matches(c, &term))
        .cloned()
        .collect();
    clients.sort_by(|a, b| a.name.cmp(&b.name));
    Json(clients)
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/clients",
    request_body = NewClient,
    responses(
        (status = 201, description = "Client registered", body = Client),
        (status = 400, description = "Missing name"),
        (status = 500, description = "Save failed")
    ),
    tag = "Schedule"
))]
pub async fn create_client_handler(
    State(state): State<Arc<ScheduleState>>,
    Json(client): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), SalonSyncError> {
    client.validate()?;
    let created = state
        .store
        .add_client(client)
        .await
        .map_err(|e| save_error("Failed to add client", e))?;
    Ok((StatusCode::CREATED, Json(created)))
}
