// --- File: crates/services/salonsync_backend/src/app_state.rs ---
use std::sync::Arc;

use salonsync_common::error::SalonSyncError;
use salonsync_config::AppConfig;
use salonsync_firestore::UserAuthClient;
use salonsync_gemini::{AssistantState, LiveConfig};
use salonsync_schedule::settings::initial_settings;
use salonsync_schedule::time::salon_time_zone;
use salonsync_schedule::{ScheduleState, SettingsHandle};

use crate::service_factory::SalonServiceFactory;
use crate::voice::VoiceState;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub schedule: Arc<ScheduleState>,
    pub assistant: Arc<AssistantState>,
    pub voice: Arc<VoiceState>,
    /// Present when operator sign-in is configured.
    pub auth: Option<Arc<UserAuthClient>>,
}

impl AppState {
    /// Builds every service the configuration asks for.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, SalonSyncError> {
        let factory = SalonServiceFactory::new(config.clone());
        let store = factory.store().await?;
        let schedule = Arc::new(ScheduleState::new(
            SettingsHandle::new(initial_settings(&config)),
            store,
            salon_time_zone(&config),
        ));

        Ok(Self::from_parts(
            config,
            schedule,
            factory.text_client(),
            factory.live_config(),
            factory.auth_client(),
        ))
    }

    /// Assembles state from ready-made parts; tests use this to inject stores
    /// and mock endpoints.
    pub fn from_parts(
        config: Arc<AppConfig>,
        schedule: Arc<ScheduleState>,
        text: Option<salonsync_gemini::GeminiTextClient>,
        live: Option<LiveConfig>,
        auth: Option<UserAuthClient>,
    ) -> Self {
        let assistant = Arc::new(AssistantState {
            schedule: schedule.clone(),
            text: text.map(Arc::new),
        });
        let voice = Arc::new(VoiceState {
            schedule: schedule.clone(),
            live,
        });

        Self {
            config,
            schedule,
            assistant,
            voice,
            auth: auth.map(Arc::new),
        }
    }
}
