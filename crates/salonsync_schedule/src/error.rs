// --- File: crates/salonsync_schedule/src/error.rs ---
use salonsync_common::error::SalonSyncError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Local time does not exist in the salon time zone: {0}")]
    NonexistentLocalTime(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl From<ScheduleError> for SalonSyncError {
    fn from(err: ScheduleError) -> Self {
        SalonSyncError::ValidationError(err.to_string())
    }
}
