// --- File: crates/salonsync_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the browser bundle; served as a plain pass-through.
    #[serde(default)]
    pub static_dir: Option<String>,
}

// --- Salon Config ---
// The single operator whose collections are served by this backend.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SalonConfig {
    pub owner_uid: String, // Firestore path segment: users/{owner_uid}/...
    pub time_zone: Option<String>, // IANA name, e.g. "Europe/Budapest"
    pub default_language: Option<String>, // "hu" | "en" | "ro"
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            owner_uid: "local".to_string(),
            time_zone: None,
            default_language: None,
        }
    }
}

// --- Firestore Config ---
// Holds non-secret Firestore config. The service account key lives on disk.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FirestoreConfig {
    pub project_id: Option<String>, // Mandatory unless base_url points to an emulator
    pub key_path: Option<String>,   // Service account JSON
    /// Overrides the REST endpoint (emulator or test server). Disables OAuth.
    pub base_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    /// Web API key for the Identity Toolkit sign-in / sign-up endpoints.
    pub web_api_key: Option<String>,
    pub auth_base_url: Option<String>,
}

// --- Gemini Config ---
// API key loaded via the "secret_from_env" marker: GEMINI_API_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub live_url: Option<String>,
    pub live_model: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub salon: SalonConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_firestore: bool,
    #[serde(default)]
    pub use_gemini: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
                static_dir: None,
            },
            salon: SalonConfig::default(),
            use_firestore: false,
            use_gemini: false,
            firestore: None,
            gemini: None,
        }
    }
}
