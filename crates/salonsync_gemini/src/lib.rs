//! Gemini integration for SalonSync
//!
//! - Text helpers on `generateContent`: a Hungarian reminder SMS and a short
//!   analysis of the upcoming schedule, both with fixed fallback messages
//! - Gemini Live voice sessions: PCM audio codec, wire protocol, the
//!   `check_availability` / `book_appointment` tools and a WebSocket client
//! - Wake word matching for hands-free activation
//!
//! # API Endpoints
//!
//! - `POST /assistant/reminder/{id}` - Reminder SMS for one appointment
//! - `POST /assistant/summary` - Tips about the next appointments
//! - `GET /voice/wake-word` - Recognizer locale and wake word
//! - `POST /voice/wake` - Decide whether a transcript opens a session

pub mod audio;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod logic_test;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod text;
pub mod tools;
pub mod wake_word;

pub use error::{GeminiError, VoiceError};
pub use handlers::AssistantState;
pub use routes::routes;
pub use session::{connect, LiveConfig, LiveReceiver, LiveSender};
pub use text::GeminiTextClient;
pub use tools::{build_setup, dispatch, ToolHost};

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::AssistantApiDoc;
}
