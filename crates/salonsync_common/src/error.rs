use std::fmt;
use thiserror::Error;

/// The base error type for all SalonSync errors.
///
/// Each crate keeps its own error enum and converts into this one at the
/// HTTP boundary through `From` impls.
#[derive(Error, Debug)]
pub enum SalonSyncError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is signed in but may not access this resource
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred while talking to the document store
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A feature is switched off in the runtime configuration
    #[error("Service unavailable: {0}")]
    UnavailableError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SalonSyncError {
    fn status_code(&self) -> u16 {
        match self {
            SalonSyncError::HttpError(_) => 500,
            SalonSyncError::ParseError(_) => 400,
            SalonSyncError::ConfigError(_) => 500,
            SalonSyncError::AuthError(_) => 401,
            SalonSyncError::ForbiddenError(_) => 403,
            SalonSyncError::ValidationError(_) => 400,
            SalonSyncError::StoreError(_) => 500,
            SalonSyncError::ExternalServiceError { .. } => 502,
            SalonSyncError::NotFoundError(_) => 404,
            SalonSyncError::UnavailableError(_) => 503,
            SalonSyncError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for SalonSyncError {
    fn from(err: reqwest::Error) -> Self {
        SalonSyncError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for SalonSyncError {
    fn from(err: serde_json::Error) -> Self {
        SalonSyncError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> SalonSyncError {
    SalonSyncError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> SalonSyncError {
    SalonSyncError::NotFoundError(message.to_string())
}

pub fn unavailable<T: fmt::Display>(message: T) -> SalonSyncError {
    SalonSyncError::UnavailableError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SalonSyncError {
    SalonSyncError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SalonSyncError {
    SalonSyncError::InternalError(message.to_string())
}
