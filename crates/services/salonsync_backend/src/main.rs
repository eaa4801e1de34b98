// File: services/salonsync_backend/src/main.rs
use std::sync::Arc;

use salonsync_backend::{build_app, AppState};
use salonsync_common::logging;
use salonsync_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            error!("Failed to load config: {}", err);
            std::process::exit(1);
        }
    };

    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize services: {}", err);
            std::process::exit(1);
        }
    };

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = build_app(&state);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use salonsync_firestore::openapi::AuthApiDoc;
        use salonsync_gemini::openapi::AssistantApiDoc;
        use salonsync_schedule::doc::ScheduleApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "SalonSync API",
                version = "0.1.0",
                description = "SalonSync salon booking API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "SalonSync", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(ScheduleApiDoc::openapi());
        openapi_doc.merge(AssistantApiDoc::openapi());
        if state.auth.is_some() {
            openapi_doc.merge(AuthApiDoc::openapi());
        }
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", err);
    }
}
