use axum::{routing::post, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{sign_in_handler, sign_up_handler, AuthState};
use crate::user_auth::UserAuthClient;

/// Create the operator auth routes
///
/// # Arguments
///
/// * `client` - Identity Toolkit client configured with the web API key
///
/// # Returns
///
/// An Axum router with the sign-in and sign-up endpoints
pub fn routes(client: Arc<UserAuthClient>) -> Router {
    info!("Auth routes initialized");

    let state = Arc::new(AuthState { client });

    Router::new()
        .route("/auth/sign-in", post(sign_in_handler))
        .route("/auth/sign-up", post(sign_up_handler))
        .with_state(state)
}
