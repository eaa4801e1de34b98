use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    reminder_handler, summary_handler, wake_handler, wake_word_config_handler, AssistantState,
};

/// Assistant text helpers and wake word endpoints.
///
/// The wake word endpoints work without Gemini; the text helpers answer 503
/// until a key is configured.
pub fn routes(state: Arc<AssistantState>) -> Router {
    info!(
        "Assistant routes initialized (text generation {})",
        if state.text.is_some() { "on" } else { "off" }
    );

    Router::new()
        .route("/assistant/reminder/{id}", post(reminder_handler))
        .route("/assistant/summary", post(summary_handler))
        .route("/voice/wake-word", get(wake_word_config_handler))
        .route("/voice/wake", post(wake_handler))
        .with_state(state)
}
