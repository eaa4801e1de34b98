#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::AssistantMessage;
use crate::wake_word::{WakeDecision, WakeRequest, WakeWordConfig};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::reminder_handler,
        crate::handlers::summary_handler,
        crate::handlers::wake_word_config_handler,
        crate::handlers::wake_handler
    ),
    components(
        schemas(AssistantMessage, WakeWordConfig, WakeRequest, WakeDecision)
    ),
    tags(
        (name = "Assistant", description = "Gemini text helpers and voice activation")
    ),
    servers(
        (url = "/api", description = "SalonSync API server")
    )
)]
pub struct AssistantApiDoc;
