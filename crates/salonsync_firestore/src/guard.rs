//! Gate for the salon API once operator sign-in is configured.
//!
//! Requests carry the Firebase ID token returned by sign-in, either as
//! `Authorization: Bearer <token>` or, for the voice WebSocket where browsers
//! cannot set headers, as an `access_token` query parameter. The token must
//! belong to the salon's `owner_uid`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use salonsync_common::error::SalonSyncError;
use tracing::{debug, warn};

use crate::user_auth::UserAuthClient;

/// How long a checked token is trusted before it is looked up again.
pub const VERIFIED_TOKEN_TTL: Duration = Duration::from_secs(300);

const ACCESS_TOKEN_PARAM: &str = "access_token";

pub struct OperatorGuard {
    client: Arc<UserAuthClient>,
    owner_uid: String,
    verified: Mutex<HashMap<String, Instant>>,
}

impl OperatorGuard {
    pub fn new(client: Arc<UserAuthClient>, owner_uid: impl Into<String>) -> Self {
        Self {
            client,
            owner_uid: owner_uid.into(),
            verified: Mutex::new(HashMap::new()),
        }
    }

    /// Accepts the token when it resolves to the salon owner.
    pub async fn authorize(&self, id_token: &str) -> Result<(), SalonSyncError> {
        if self.recently_verified(id_token) {
            return Ok(());
        }

        let user = self.client.verify_id_token(id_token).await?;
        if user.local_id != self.owner_uid {
            warn!(uid = %user.local_id, "Signed-in user is not the salon owner");
            return Err(SalonSyncError::ForbiddenError(
                "Signed-in user does not own this salon".to_string(),
            ));
        }

        if let Ok(mut verified) = self.verified.lock() {
            let now = Instant::now();
            verified.retain(|_, until| *until > now);
            verified.insert(id_token.to_string(), now + VERIFIED_TOKEN_TTL);
        }
        debug!("Operator token accepted");
        Ok(())
    }

    fn recently_verified(&self, id_token: &str) -> bool {
        self.verified
            .lock()
            .map(|verified| {
                verified
                    .get(id_token)
                    .is_some_and(|until| *until > Instant::now())
            })
            .unwrap_or(false)
    }
}

/// Bearer token from the `Authorization` header, else the `access_token`
/// query parameter.
pub fn request_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    let query = request.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == ACCESS_TOKEN_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Axum middleware rejecting requests without a valid owner token.
pub async fn require_operator(
    State(guard): State<Arc<OperatorGuard>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = request_token(&request) else {
        debug!("Rejecting {} without a token", request.uri().path());
        return SalonSyncError::AuthError("Sign-in required".to_string()).into_response();
    };

    match guard.authorize(&token).await {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
