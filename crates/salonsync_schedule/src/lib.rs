// --- File: crates/salonsync_schedule/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod dashboard;
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod logic_proptest;
pub mod month;
pub mod routes;
pub mod settings;
pub mod time;

pub use error::ScheduleError;
pub use handlers::ScheduleState;
pub use routes::routes;
pub use settings::SettingsHandle;
