//! HTTP handlers for operator sign-in and sign-up

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use salonsync_common::error::{validation_error, SalonSyncError};
use tracing::debug;

use crate::user_auth::{AuthSession, Credentials, UserAuthClient};

/// Shared state for the auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub client: Arc<UserAuthClient>,
}

fn check_credentials(credentials: &Credentials) -> Result<(), SalonSyncError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(validation_error("Email and password are required"));
    }
    Ok(())
}

/// Sign in with email and password
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = AuthSession),
        (status = 400, description = "Invalid email"),
        (status = 401, description = "Wrong email or password")
    ),
    tag = "Auth"
))]
pub async fn sign_in_handler(
    State(state): State<Arc<AuthState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthSession>, SalonSyncError> {
    check_credentials(&credentials)?;
    debug!("Sign-in attempt for {}", credentials.email);
    let session = state
        .client
        .sign_in(credentials.email.trim(), &credentials.password)
        .await?;
    Ok(Json(session))
}

/// Register a new operator account
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = AuthSession),
        (status = 400, description = "Invalid email, email in use or weak password")
    ),
    tag = "Auth"
))]
pub async fn sign_up_handler(
    State(state): State<Arc<AuthState>>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<AuthSession>), SalonSyncError> {
    check_credentials(&credentials)?;
    let session = state
        .client
        .sign_up(credentials.email.trim(), &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}
