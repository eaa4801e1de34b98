// --- File: crates/salonsync_common/src/i18n.rs ---
//! Fixed user-facing strings.
//!
//! The salon's operator messages are Hungarian; the per-language helpers on
//! [`Language`] cover what the calendar and the voice assistant localize.

use std::str::FromStr;

use crate::error::{validation_error, SalonSyncError};
use crate::models::Language;

/// Shown when a client or appointment write fails.
pub const SAVE_FAILED: &str = "Hiba a mentés során.";

/// Service name used in reminder messages when none is known.
pub const DEFAULT_SERVICE_NAME: &str = "Hajvágás";

/// Service label used by the calendar when none is known.
pub const GENERAL_SERVICE_LABEL: &str = "General";

/// Service name in the schedule summary when the id is unknown.
pub const UNKNOWN_SERVICE_NAME: &str = "Ismeretlen";

impl Language {
    /// BCP 47 tag for the speech recognizer.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::Hu => "hu-HU",
            Language::Ro => "ro-RO",
            Language::En => "en-US",
        }
    }

    /// Name of the language in English, as used in the voice prompt.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::Hu => "Hungarian",
            Language::Ro => "Romanian",
            Language::En => "English",
        }
    }

    /// Display name for appointments without a client name.
    pub fn guest_name(self) -> &'static str {
        match self {
            Language::Hu => "Vendég",
            Language::Ro => "Oaspete",
            Language::En => "Guest",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Hu => "hu",
            Language::Ro => "ro",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = SalonSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hu" => Ok(Language::Hu),
            "en" => Ok(Language::En),
            "ro" => Ok(Language::Ro),
            other => Err(validation_error(format!("Unsupported language: {}", other))),
        }
    }
}
