//! Builds the store and external clients from configuration.
//!
//! Firestore is used when `use_firestore` is set and a `[firestore]` section
//! exists; otherwise appointments live in memory. Gemini and operator sign-in
//! are optional and simply stay off when not configured.

use std::sync::Arc;
use std::time::Duration;

use salonsync_common::error::SalonSyncError;
use salonsync_common::services::AppointmentStore;
use salonsync_common::{is_firestore_enabled, is_gemini_enabled, MemoryStore};
use salonsync_config::{AppConfig, SECRET_FROM_ENV};
use salonsync_firestore::{
    FirestoreClient, FirestoreStore, UserAuthClient, DEFAULT_POLL_INTERVAL_SECS,
};
use salonsync_gemini::{GeminiTextClient, LiveConfig};
use tracing::{info, warn};

pub struct SalonServiceFactory {
    config: Arc<AppConfig>,
}

impl SalonServiceFactory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Opens the configured store. Firestore collections are loaded once and
    /// then kept current by background pollers.
    pub async fn store(&self) -> Result<Arc<dyn AppointmentStore>, SalonSyncError> {
        let firestore_config = match self.config.firestore.as_ref() {
            Some(firestore) if is_firestore_enabled(&self.config) => firestore,
            _ => {
                info!("Using the in-memory appointment store");
                return Ok(Arc::new(MemoryStore::new()));
            }
        };

        info!("Initializing Firestore store...");
        let client = FirestoreClient::from_config(firestore_config).await?;
        let store = Arc::new(FirestoreStore::new(
            client,
            self.config.salon.owner_uid.clone(),
        ));
        store.refresh_all().await?;

        let interval = Duration::from_secs(
            firestore_config
                .poll_interval_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        );
        store.spawn_live_queries(interval);
        info!("Firestore store ready, polling every {:?}", interval);
        Ok(store as Arc<dyn AppointmentStore>)
    }

    pub fn text_client(&self) -> Option<GeminiTextClient> {
        let gemini = self.gemini_config()?;
        match GeminiTextClient::from_config(gemini) {
            Ok(client) => {
                info!("Gemini text helpers enabled ({})", client.model());
                Some(client)
            }
            Err(err) => {
                warn!("Gemini text helpers disabled: {}", err);
                None
            }
        }
    }

    pub fn live_config(&self) -> Option<LiveConfig> {
        let gemini = self.gemini_config()?;
        if !has_secret(&gemini.api_key) {
            warn!("Voice assistant disabled: GEMINI_API_KEY is not set");
            return None;
        }
        Some(LiveConfig::from_config(gemini))
    }

    pub fn auth_client(&self) -> Option<UserAuthClient> {
        let firestore = self.config.firestore.as_ref()?;
        if !firestore.web_api_key.as_deref().is_some_and(has_secret) {
            info!("Operator sign-in disabled: no web API key");
            return None;
        }
        UserAuthClient::from_config(firestore)
    }

    fn gemini_config(&self) -> Option<&salonsync_config::GeminiConfig> {
        if is_gemini_enabled(&self.config) {
            self.config.gemini.as_ref()
        } else {
            None
        }
    }
}

fn has_secret(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != SECRET_FROM_ENV
}
