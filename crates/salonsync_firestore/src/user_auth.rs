//! Email/password accounts through the Firebase Identity Toolkit REST API
//!
//! The salon operator signs in with email and password. Identity Toolkit
//! error codes are mapped onto the fixed Hungarian messages shown on the
//! sign-in screen. ID tokens handed back to the API are checked with
//! `accounts:lookup`.

use reqwest::Client;
use salonsync_common::error::{external_service_error, SalonSyncError};
use salonsync_common::http::client::HTTP_CLIENT;
use salonsync_config::FirestoreConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Public Identity Toolkit endpoint
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";

/// A failed sign-in or sign-up, carrying the message shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Érvénytelen email cím.")]
    InvalidEmail,
    #[error("Hibás email vagy jelszó.")]
    WrongCredentials,
    #[error("Ez az email már regisztrálva van.")]
    EmailInUse,
    #[error("A jelszó túl gyenge (min 6 karakter).")]
    WeakPassword,
    #[error("A munkamenet lejárt, jelentkezz be újra.")]
    SessionExpired,
    #[error("Hiba történt.")]
    Other(String),
}

impl AuthFailure {
    /// Maps an Identity Toolkit error code such as `EMAIL_NOT_FOUND`.
    ///
    /// Codes may carry a detail suffix (`WEAK_PASSWORD : Password should be...`).
    pub fn from_code(code: &str) -> Self {
        let code = code.split(':').next().unwrap_or(code).trim();
        match code {
            "INVALID_EMAIL" => AuthFailure::InvalidEmail,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => AuthFailure::WrongCredentials,
            "EMAIL_EXISTS" => AuthFailure::EmailInUse,
            "WEAK_PASSWORD" => AuthFailure::WeakPassword,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => AuthFailure::SessionExpired,
            other => AuthFailure::Other(other.to_string()),
        }
    }
}

impl From<AuthFailure> for SalonSyncError {
    fn from(err: AuthFailure) -> Self {
        match err {
            AuthFailure::WrongCredentials | AuthFailure::SessionExpired => {
                SalonSyncError::AuthError(err.to_string())
            }
            AuthFailure::Other(_) => external_service_error("identitytoolkit", err),
            _ => SalonSyncError::ValidationError(err.to_string()),
        }
    }
}

/// Request body for sign-in and sign-up
#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Credentials {
    #[cfg_attr(feature = "openapi", schema(example = "owner@salon.hu"))]
    pub email: String,
    pub password: String,
}

/// A signed-in operator session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthSession {
    /// Firebase user id
    pub local_id: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds until `id_token` expires
    pub expires_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

/// The account an ID token belongs to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<VerifiedUser>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for the Identity Toolkit account endpoints
#[derive(Debug, Clone)]
pub struct UserAuthClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl UserAuthClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: HTTP_CLIENT.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Builds a client when the config carries a web API key.
    pub fn from_config(config: &FirestoreConfig) -> Option<Self> {
        let api_key = config.web_api_key.as_deref()?;
        let base_url = config.auth_base_url.as_deref().unwrap_or(DEFAULT_AUTH_URL);
        Some(Self::new(base_url, api_key))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthFailure> {
        self.call("signInWithPassword", email, password).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthFailure> {
        self.call("signUp", email, password).await
    }

    /// Resolves an ID token to its account. Expired or revoked tokens fail
    /// with [`AuthFailure::SessionExpired`].
    pub async fn verify_id_token(&self, id_token: &str) -> Result<VerifiedUser, AuthFailure> {
        let response: LookupResponse = self
            .post("lookup", &LookupRequest { id_token })
            .await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or(AuthFailure::SessionExpired)
    }

    async fn call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthFailure> {
        let session: AuthSession = self
            .post(
                method,
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        info!(uid = %session.local_id, "{} succeeded", method);
        Ok(session)
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, AuthFailure>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/v1/accounts:{}", self.base_url, method);
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity Toolkit request failed: {}", e);
                AuthFailure::Other(e.to_string())
            })?;

        if response.status().is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AuthFailure::Other(e.to_string()));
        }

        let code = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_default();
        let failure = AuthFailure::from_code(&code);
        warn!("{} rejected: {}", method, code);
        Err(failure)
    }
}
