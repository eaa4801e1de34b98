//! Runtime feature flags.
//!
//! - `use_firestore`: persist to Cloud Firestore instead of the in-memory store
//! - `use_gemini`: enable the text helpers and the voice bridge
//!
//! A flag only counts when its configuration section is present as well.

use salonsync_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Firestore store is enabled at runtime.
pub fn is_firestore_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_firestore, config.firestore.as_ref())
}

/// Check if the Gemini helpers are enabled at runtime.
pub fn is_gemini_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_gemini, config.gemini.as_ref())
}
