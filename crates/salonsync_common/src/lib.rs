// --- File: crates/salonsync_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod http; // HTTP utilities
pub mod i18n; // Fixed user-facing strings
pub mod live; // Live collection snapshots
pub mod logging; // Logging utilities
pub mod memory; // In-process store
pub mod models; // Domain records
pub mod services; // Store abstraction

// Re-export error types and utilities for easier access
pub use error::{
    external_service_error, internal_error, not_found, unavailable, validation_error,
    HttpStatusCode, SalonSyncError,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, HTTP_CLIENT};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// Re-export feature flag handling utilities for easier access
pub use features::{is_feature_enabled, is_firestore_enabled, is_gemini_enabled};

pub use live::{LiveCollection, Snapshot};
pub use memory::MemoryStore;
pub use services::{AppointmentStore, BoxFuture};
