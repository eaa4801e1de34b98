//! Cloud Firestore REST client
//!
//! A thin client over the Firestore v1 `documents` resource. It covers what
//! the salon store needs: create a document in a collection, patch selected
//! fields of a document, delete a document and list a whole collection.
//!
//! Requests carry a service account bearer token unless the client was built
//! for an emulator or a test server.

use std::collections::HashMap;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use salonsync_common::error::{external_service_error, SalonSyncError};
use salonsync_common::http::client::HTTP_CLIENT;
use salonsync_config::FirestoreConfig;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::auth::{service_account_tokens, TokenSource};

/// Public Firestore endpoint
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Largest page the list endpoint hands out
const PAGE_SIZE: &str = "300";

/// Errors that can occur when talking to Firestore
#[derive(Error, Debug)]
pub enum FirestoreError {
    /// Error while obtaining an access token
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during the HTTP request itself
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// The addressed document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Error status returned by the Firestore API
    #[error("Firestore API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// A stored document could not be mapped to a domain record
    #[error("Malformed document {name}: {reason}")]
    DecodeError { name: String, reason: String },
}

impl From<FirestoreError> for SalonSyncError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::NotFound(name) => SalonSyncError::NotFoundError(name),
            FirestoreError::ConfigError(msg) => SalonSyncError::ConfigError(msg),
            FirestoreError::AuthError(msg) => SalonSyncError::AuthError(msg),
            other => external_service_error("firestore", other),
        }
    }
}

/// A Firestore document as returned by the REST API
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name: `projects/{p}/databases/(default)/documents/{path}`
    pub name: String,

    /// Typed field values, e.g. `{"name": {"stringValue": "Anna"}}`
    #[serde(default)]
    pub fields: HashMap<String, Value>,

    #[serde(default)]
    pub create_time: Option<String>,

    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// The document id: the last segment of its resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for the Firestore REST API of one project
#[derive(Clone)]
pub struct FirestoreClient {
    http: Client,
    /// `{base}/v1/projects/{project}/databases/(default)/documents`
    documents_url: String,
    tokens: Option<TokenSource>,
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("documents_url", &self.documents_url)
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}

impl FirestoreClient {
    /// Creates a client from configuration.
    ///
    /// With `base_url` set (emulator, test server) requests go there without
    /// credentials. Otherwise the service account at `key_path` is used.
    ///
    /// # Errors
    ///
    /// Fails if `project_id` is missing, or if no `base_url` is set and the
    /// service account key cannot be loaded.
    pub async fn from_config(config: &FirestoreConfig) -> Result<Self, FirestoreError> {
        let project_id = config.project_id.as_deref().ok_or_else(|| {
            FirestoreError::ConfigError("Missing project_id in FirestoreConfig".to_string())
        })?;

        match config.base_url.as_deref() {
            Some(base_url) => Ok(Self::unauthenticated(base_url, project_id)),
            None => {
                let key_path = config.key_path.as_deref().ok_or_else(|| {
                    FirestoreError::ConfigError("Missing key_path in FirestoreConfig".to_string())
                })?;
                let tokens = service_account_tokens(key_path).await?;
                Ok(Self::with_tokens(DEFAULT_FIRESTORE_URL, project_id, tokens))
            }
        }
    }

    /// A client that sends no credentials.
    pub fn unauthenticated(base_url: &str, project_id: &str) -> Self {
        Self::build(base_url, project_id, None)
    }

    pub fn with_tokens(base_url: &str, project_id: &str, tokens: TokenSource) -> Self {
        Self::build(base_url, project_id, Some(tokens))
    }

    fn build(base_url: &str, project_id: &str, tokens: Option<TokenSource>) -> Self {
        Self {
            http: HTTP_CLIENT.clone(),
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                project_id
            ),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path.trim_matches('/'))
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, FirestoreError> {
        match &self.tokens {
            Some(tokens) => Ok(request.bearer_auth(tokens().await?)),
            None => Ok(request),
        }
    }

    async fn check(response: Response, path: &str) -> Result<Response, FirestoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FirestoreError::NotFound(path.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        Err(FirestoreError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    /// Creates a document with a generated id in `collection`.
    pub async fn create_document(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<Document, FirestoreError> {
        debug!("Creating document in {}", collection);
        let request = self
            .http
            .post(self.url(collection))
            .json(&serde_json::json!({ "fields": fields }));
        let response = self.authorize(request).await?.send().await?;
        let response = Self::check(response, collection).await?;
        Ok(response.json::<Document>().await?)
    }

    /// Writes only the fields named in `field_paths`; the document must exist.
    pub async fn patch_document(
        &self,
        document: &str,
        fields: Map<String, Value>,
        field_paths: &[&str],
    ) -> Result<Document, FirestoreError> {
        debug!("Patching {} ({:?})", document, field_paths);
        let mut query: Vec<(&str, &str)> = field_paths
            .iter()
            .map(|path| ("updateMask.fieldPaths", *path))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let request = self
            .http
            .patch(self.url(document))
            .query(&query)
            .json(&serde_json::json!({ "fields": fields }));
        let response = self.authorize(request).await?.send().await?;
        let response = Self::check(response, document).await?;
        Ok(response.json::<Document>().await?)
    }

    /// Deletes a document. Deleting a missing document succeeds.
    pub async fn delete_document(&self, document: &str) -> Result<(), FirestoreError> {
        debug!("Deleting {}", document);
        let request = self.http.delete(self.url(document));
        let response = self.authorize(request).await?.send().await?;
        Self::check(response, document).await?;
        Ok(())
    }

    /// Lists every document of `collection`, following page tokens.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let request = self.http.get(self.url(collection)).query(&query);
            let response = self.authorize(request).await?.send().await?;
            let page = match Self::check(response, collection).await {
                Ok(response) => response.json::<ListDocumentsResponse>().await?,
                // A collection that was never written to lists as empty
                Err(FirestoreError::NotFound(_)) => break,
                Err(e) => return Err(e),
            };
            documents.extend(page.documents);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!("Listed {} documents in {}", documents.len(), collection);
        Ok(documents)
    }
}
