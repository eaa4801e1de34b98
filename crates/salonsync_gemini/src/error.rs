use salonsync_common::error::{external_service_error, SalonSyncError};
use thiserror::Error;

/// Errors from the Gemini REST API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Missing configuration: {0}")]
    ConfigError(String),
}

impl From<GeminiError> for SalonSyncError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ConfigError(msg) => SalonSyncError::ConfigError(msg),
            other => external_service_error("gemini", other),
        }
    }
}

/// Errors from a Live voice session
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid Live URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid message: {0}")]
    Protocol(String),

    #[error("Invalid audio payload: {0}")]
    Audio(String),

    #[error("Session closed before setup completed")]
    SetupIncomplete,

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),
}

impl From<serde_json::Error> for VoiceError {
    fn from(err: serde_json::Error) -> Self {
        VoiceError::Protocol(err.to_string())
    }
}

impl From<VoiceError> for SalonSyncError {
    fn from(err: VoiceError) -> Self {
        external_service_error("gemini-live", err)
    }
}
