// --- File: crates/salonsync_schedule/src/settings.rs ---
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use salonsync_common::models::{AppSettings, Language};
use salonsync_config::AppConfig;
use tracing::{info, warn};

use crate::error::ScheduleError;

/// Business hours must satisfy `0 <= start < end <= 23`.
pub fn validate_settings(settings: &AppSettings) -> Result<(), ScheduleError> {
    if settings.business_start_hour >= settings.business_end_hour {
        return Err(ScheduleError::InvalidSettings(format!(
            "business start hour {} must be before end hour {}",
            settings.business_start_hour, settings.business_end_hour
        )));
    }
    if settings.business_end_hour > 23 {
        return Err(ScheduleError::InvalidSettings(format!(
            "business end hour {} is past 23",
            settings.business_end_hour
        )));
    }
    if settings.default_duration == 0 {
        return Err(ScheduleError::InvalidSettings(
            "default duration must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Settings at startup: defaults, with the language taken from the config.
pub fn initial_settings(config: &AppConfig) -> AppSettings {
    let mut settings = AppSettings::default();
    if let Some(code) = config.salon.default_language.as_deref() {
        match Language::from_str(code) {
            Ok(language) => settings.language = language,
            Err(e) => warn!("Ignoring default_language: {}", e),
        }
    }
    settings
}

/// Process-wide settings shared by the handlers and the voice bridge.
///
/// Replacing them never touches stored appointments; views pick up the new
/// values on the next request.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<AppSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn get(&self) -> AppSettings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, settings: AppSettings) -> Result<AppSettings, ScheduleError> {
        validate_settings(&settings)?;
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = settings.clone();
        info!(
            start = settings.business_start_hour,
            end = settings.business_end_hour,
            language = settings.language.code(),
            "Settings updated"
        );
        Ok(settings)
    }
}
