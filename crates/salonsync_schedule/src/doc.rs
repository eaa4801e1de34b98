// File: crates/salonsync_schedule/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::availability::AvailabilityResult;
use crate::calendar::{AppointmentBlock, DayView, TimeSlot};
use crate::dashboard::{Dashboard, UpcomingAppointment};
use crate::month::{Density, MonthDay, MonthView};
use salonsync_common::models::{
    AppSettings, Appointment, AppointmentPatch, Client, Language, NewAppointment, NewClient,
    Profession, Service, Specialization, Theme,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_settings_handler,
        crate::handlers::update_settings_handler,
        crate::handlers::get_services_handler,
        crate::handlers::get_day_view_handler,
        crate::handlers::get_month_view_handler,
        crate::handlers::get_dashboard_handler,
        crate::handlers::get_upcoming_handler,
        crate::handlers::get_availability_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::create_appointment_handler,
        crate::handlers::update_appointment_handler,
        crate::handlers::delete_appointment_handler,
        crate::handlers::list_clients_handler,
        crate::handlers::create_client_handler
    ),
    components(
        schemas(
            AppSettings,
            Language,
            Specialization,
            Profession,
            Theme,
            Service,
            Client,
            NewClient,
            Appointment,
            NewAppointment,
            AppointmentPatch,
            AvailabilityResult,
            TimeSlot,
            AppointmentBlock,
            DayView,
            Density,
            MonthDay,
            MonthView,
            UpcomingAppointment,
            Dashboard
        )
    ),
    tags(
        (name = "Schedule", description = "Salon booking, calendar and settings API")
    ),
    servers(
        (url = "/api", description = "SalonSync API server")
    )
)]
pub struct ScheduleApiDoc;
