// --- File: crates/salonsync_schedule/src/routes.rs ---

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::{
    create_appointment_handler, create_client_handler, delete_appointment_handler,
    get_availability_handler, get_dashboard_handler, get_day_view_handler, get_month_view_handler,
    get_services_handler, get_settings_handler, get_upcoming_handler, list_appointments_handler,
    list_clients_handler, update_appointment_handler, update_settings_handler, ScheduleState,
};

/// Creates a router containing the booking, calendar and settings routes.
pub fn routes(state: Arc<ScheduleState>) -> Router {
    Router::new()
        .route(
            "/settings",
            get(get_settings_handler).put(update_settings_handler),
        )
        .route("/services", get(get_services_handler))
        .route("/calendar/day", get(get_day_view_handler))
        .route("/calendar/month", get(get_month_view_handler))
        .route("/dashboard", get(get_dashboard_handler))
        .route("/upcoming", get(get_upcoming_handler))
        .route("/availability", get(get_availability_handler))
        .route(
            "/appointments",
            get(list_appointments_handler).post(create_appointment_handler),
        )
        .route(
            "/appointments/{id}",
            patch(update_appointment_handler).delete(delete_appointment_handler),
        )
        .route(
            "/clients",
            get(list_clients_handler).post(create_client_handler),
        )
        .with_state(state)
}
