//! Cloud Firestore persistence for SalonSync
//!
//! This crate stores the salon's clients and appointments in Cloud Firestore
//! through its REST API and keeps live snapshots of both collections.
//!
//! # Features
//!
//! - Service account authentication (OAuth2, Datastore scope)
//! - Create, partial update (update mask), delete and paged list of documents
//! - `timestampValue` start times, with RFC 3339 strings accepted on read
//! - Polling live queries that publish whole-list snapshots
//! - Email/password operator accounts through the Identity Toolkit API
//! - An axum middleware that admits only the salon owner's ID token
//! - OpenAPI documentation (with the `openapi` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use salonsync_config::FirestoreConfig;
//! use salonsync_firestore::{FirestoreClient, FirestoreStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn setup(config: &FirestoreConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FirestoreClient::from_config(config).await?;
//!     let store = Arc::new(FirestoreStore::new(client, "owner-uid"));
//!     store.refresh_all().await?;
//!     store.spawn_live_queries(Duration::from_secs(5));
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /auth/sign-in` - Sign in with email and password
//! - `POST /auth/sign-up` - Register an operator account

pub mod auth;
pub mod client;
pub mod codec;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod store;
pub mod user_auth;

pub use client::{FirestoreClient, FirestoreError};
pub use guard::{require_operator, OperatorGuard};
pub use routes::routes;
pub use store::{FirestoreStore, DEFAULT_POLL_INTERVAL_SECS};
pub use user_auth::{AuthFailure, UserAuthClient, VerifiedUser};

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::AuthApiDoc;
}
