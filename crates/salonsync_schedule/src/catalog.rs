// --- File: crates/salonsync_schedule/src/catalog.rs ---
//! Fixed service catalogs and the per-salon duration overrides.

use std::collections::HashMap;

use salonsync_common::models::{
    AppSettings, Appointment, Profession, Service, Specialization, DEFAULT_DURATION_MINUTES,
};

/// Colour tag for blocks without a known service.
pub const NEUTRAL_COLOR: &str = "border-neutral-300 bg-neutral-100 text-neutral-700 dark:border-neutral-600 dark:bg-neutral-700 dark:text-neutral-200";

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    duration: u32,
    price: u32,
    color: &'static str,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    duration: u32,
    price: u32,
    color: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        duration,
        price,
        color,
    }
}

const ROSE: &str = "border-rose-400 bg-rose-50 text-rose-900 dark:bg-rose-950 dark:text-rose-100";
const AMBER: &str =
    "border-amber-400 bg-amber-50 text-amber-900 dark:bg-amber-950 dark:text-amber-100";
const SKY: &str = "border-sky-400 bg-sky-50 text-sky-900 dark:bg-sky-950 dark:text-sky-100";
const EMERALD: &str =
    "border-emerald-400 bg-emerald-50 text-emerald-900 dark:bg-emerald-950 dark:text-emerald-100";
const VIOLET: &str =
    "border-violet-400 bg-violet-50 text-violet-900 dark:bg-violet-950 dark:text-violet-100";

const SERVICES_WOMEN: &[CatalogEntry] = &[
    entry("w-cut", "Női hajvágás", 60, 9000, ROSE),
    entry("w-blowdry", "Szárítás", 30, 5000, SKY),
    entry("w-color", "Festés", 120, 18000, AMBER),
    entry("w-highlights", "Melír", 150, 24000, VIOLET),
    entry("w-treatment", "Hajpakolás", 30, 6000, EMERALD),
];

const SERVICES_MEN: &[CatalogEntry] = &[
    entry("m-cut", "Férfi hajvágás", 30, 5500, SKY),
    entry("m-beard", "Szakáll igazítás", 20, 3500, EMERALD),
    entry("m-combo", "Haj + szakáll", 50, 8000, AMBER),
    entry("m-shave", "Borotválás", 30, 4500, VIOLET),
];

const SERVICES_NAILS: &[CatalogEntry] = &[
    entry("n-manicure", "Manikűr", 45, 6000, ROSE),
    entry("n-gel", "Géllakk", 60, 8500, VIOLET),
    entry("n-extension", "Műköröm építés", 120, 14000, AMBER),
    entry("n-pedicure", "Pedikűr", 60, 8000, EMERALD),
];

const SERVICES_COSMETICS: &[CatalogEntry] = &[
    entry("c-facial", "Arckezelés", 60, 12000, EMERALD),
    entry("c-lash", "Szempilla lifting", 60, 11000, VIOLET),
    entry("c-brow", "Szemöldök formázás", 20, 3500, AMBER),
    entry("c-wax", "Gyantázás", 30, 5000, ROSE),
];

fn to_services(entries: &[CatalogEntry]) -> impl Iterator<Item = Service> + '_ {
    entries.iter().map(|e| Service {
        id: e.id.to_string(),
        name: e.name.to_string(),
        duration: e.duration,
        price: e.price,
        color: e.color.to_string(),
    })
}

/// The base catalog for a profession and specialization.
///
/// Nails and cosmetics ignore the specialization; hair picks the men's or
/// women's list, and unisex salons get the men's list followed by the women's.
pub fn base_catalog(profession: Profession, specialization: Specialization) -> Vec<Service> {
    match (profession, specialization) {
        (Profession::Nails, _) => to_services(SERVICES_NAILS).collect(),
        (Profession::Cosmetics, _) => to_services(SERVICES_COSMETICS).collect(),
        (Profession::Hair, Specialization::Men) => to_services(SERVICES_MEN).collect(),
        (Profession::Hair, Specialization::Women) => to_services(SERVICES_WOMEN).collect(),
        (Profession::Hair, Specialization::Unisex) => to_services(SERVICES_MEN)
            .chain(to_services(SERVICES_WOMEN))
            .collect(),
    }
}

/// A positive override replaces the catalog duration; zero or absent keeps it.
pub fn effective_duration(service: &Service, overrides: &HashMap<String, u32>) -> u32 {
    match overrides.get(&service.id) {
        Some(&minutes) if minutes > 0 => minutes,
        _ => service.duration,
    }
}

/// The services offered under `settings`, with overrides applied.
pub fn services_for(settings: &AppSettings) -> Vec<Service> {
    base_catalog(settings.profession, settings.specialization)
        .into_iter()
        .map(|mut service| {
            service.duration = effective_duration(&service, &settings.service_duration_overrides);
            service
        })
        .collect()
}

pub fn find_service<'a>(services: &'a [Service], id: Option<&str>) -> Option<&'a Service> {
    let id = id?;
    services.iter().find(|s| s.id == id)
}

/// Rendered duration of an appointment: its service's duration, else the default.
pub fn appointment_duration(
    appointment: &Appointment,
    services: &[Service],
    default_duration: u32,
) -> u32 {
    match find_service(services, appointment.service_id.as_deref()) {
        Some(service) if service.duration > 0 => service.duration,
        _ if default_duration > 0 => default_duration,
        _ => DEFAULT_DURATION_MINUTES,
    }
}
