//! Hands-free activation.

use salonsync_common::models::{AppSettings, Language};
use serde::{Deserialize, Serialize};

pub const WAKE_WORD: &str = "sync";

/// Case-insensitive substring match on a recognizer transcript.
pub fn contains_wake_word(transcript: &str) -> bool {
    transcript.to_lowercase().contains(WAKE_WORD)
}

/// Recognizer setup the browser needs before it starts listening.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WakeWordConfig {
    pub enabled: bool,
    pub wake_word: String,
    pub locale: String,
}

impl WakeWordConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            enabled: settings.wake_word_enabled,
            wake_word: WAKE_WORD.to_string(),
            locale: settings.language.speech_locale().to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WakeRequest {
    pub transcript: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WakeDecision {
    pub activate: bool,
    pub language: Language,
}

/// Activate only when the feature is on and the transcript names the assistant.
pub fn decide(settings: &AppSettings, transcript: &str) -> WakeDecision {
    WakeDecision {
        activate: settings.wake_word_enabled && contains_wake_word(transcript),
        language: settings.language,
    }
}
