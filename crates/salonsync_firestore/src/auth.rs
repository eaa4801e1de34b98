//! Service account authentication for the Firestore REST API
//!
//! Reads a service account key file and obtains OAuth2 access tokens with the
//! Datastore scope. The authenticator caches tokens and refreshes them before
//! they expire, so asking for a token on every request is cheap.

use std::path::Path;
use std::sync::Arc;

use salonsync_common::services::BoxFuture;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

use crate::client::FirestoreError;

/// OAuth2 scope covering Firestore document access
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Yields a bearer token for each Firestore request.
pub type TokenSource = Arc<dyn Fn() -> BoxFuture<'static, String, FirestoreError> + Send + Sync>;

/// Builds a token source from the service account key at `key_path`.
///
/// # Errors
///
/// Fails if the key file cannot be read or the authenticator cannot be built.
/// Token fetch failures surface later, on the request that needed the token.
pub async fn service_account_tokens(key_path: &str) -> Result<TokenSource, FirestoreError> {
    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| FirestoreError::AuthError(format!("reading {}: {}", key_path, e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| FirestoreError::AuthError(e.to_string()))?;
    let auth = Arc::new(auth);

    Ok(Arc::new(move || -> BoxFuture<'static, String, FirestoreError> {
        let auth = Arc::clone(&auth);
        Box::pin(async move {
            let token = auth
                .token(&[DATASTORE_SCOPE])
                .await
                .map_err(|e| FirestoreError::AuthError(e.to_string()))?;
            token
                .token()
                .map(str::to_string)
                .ok_or_else(|| FirestoreError::AuthError("No token available".to_string()))
        })
    }))
}
