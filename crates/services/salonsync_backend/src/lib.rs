//! SalonSync backend
//!
//! Wires the schedule, Firestore, Gemini and voice crates into one axum
//! application served under `/api`.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use salonsync_firestore::{require_operator, OperatorGuard};
use tower_http::services::ServeDir;
use tracing::info;

pub mod app_state;
pub mod service_factory;
pub mod voice;

pub use app_state::AppState;

/// All API routes nested under `/api`, plus the static bundle when configured.
///
/// With operator sign-in configured, every salon route requires the owner's
/// ID token; the welcome and sign-in routes stay open.
pub fn build_app(state: &AppState) -> Router {
    let mut salon = Router::new()
        .merge(salonsync_schedule::routes(state.schedule.clone()))
        .merge(salonsync_gemini::routes(state.assistant.clone()))
        .merge(voice::routes(state.voice.clone()));
    let mut router = Router::new().route("/", get(|| async { "Welcome to SalonSync API!" }));

    if let Some(auth) = state.auth.clone() {
        let owner_uid = state.config.salon.owner_uid.clone();
        info!("Salon routes restricted to operator {}", owner_uid);
        let guard = Arc::new(OperatorGuard::new(auth.clone(), owner_uid));
        salon = salon.route_layer(middleware::from_fn_with_state(guard, require_operator));
        router = router.merge(salonsync_firestore::routes(auth));
    }
    let router = router.merge(salon);

    let mut app = Router::new().nest("/api", router);

    if let Some(dir) = state.config.server.static_dir.as_deref() {
        info!("Serving static files from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }
    app
}
