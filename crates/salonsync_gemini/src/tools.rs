//! Calendar tools exposed to the voice model.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use salonsync_common::error::SalonSyncError;
use salonsync_common::i18n::SAVE_FAILED;
use salonsync_common::models::{Appointment, Language, NewAppointment};
use salonsync_common::services::BoxFuture;
use salonsync_schedule::availability::is_available;
use salonsync_schedule::time::parse_instant;
use salonsync_schedule::ScheduleState;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::protocol::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GenerationConfig, Setup, Tool,
};

pub const CHECK_AVAILABILITY: &str = "check_availability";
pub const BOOK_APPOINTMENT: &str = "book_appointment";

pub const BOOKING_CONFIRMED: &str = "Appointment confirmed.";
pub const UNKNOWN_TOOL_RESULT: &str = "Done";

/// What the voice tools need from the salon.
pub trait ToolHost: Send + Sync {
    /// Zone naive tool dates are read in.
    fn time_zone(&self) -> Tz;

    /// Whether `at` is clear of every current appointment's buffer window.
    fn is_free(&self, at: DateTime<Utc>) -> bool;

    /// Store a voice booking for `name` at `at`.
    fn book(&self, name: &str, at: DateTime<Utc>) -> BoxFuture<'_, Appointment, SalonSyncError>;
}

impl ToolHost for ScheduleState {
    fn time_zone(&self) -> Tz {
        self.time_zone
    }

    fn is_free(&self, at: DateTime<Utc>) -> bool {
        is_available(&self.store.appointments().snapshot(), at)
    }

    fn book(&self, name: &str, at: DateTime<Utc>) -> BoxFuture<'_, Appointment, SalonSyncError> {
        self.store
            .add_appointment(NewAppointment::voice_booking(name, at))
    }
}

#[derive(Deserialize, Debug)]
struct AvailabilityArgs {
    date: String,
}

#[derive(Deserialize, Debug)]
struct BookingArgs {
    date: String,
    name: String,
}

pub fn tool_declarations() -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: CHECK_AVAILABILITY.to_string(),
            description: "Checks if the professional is free at a specific date and time."
                .to_string(),
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "date": { "type": "STRING", "description": "The date and time (ISO format)" }
                },
                "required": ["date"]
            }),
        },
        FunctionDeclaration {
            name: BOOK_APPOINTMENT.to_string(),
            description: "Books a new appointment.".to_string(),
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "date": { "type": "STRING", "description": "The date and time (ISO format)" },
                    "name": { "type": "STRING", "description": "Client name" }
                },
                "required": ["date", "name"]
            }),
        },
    ]
}

pub fn system_instruction(language: Language) -> String {
    format!(
        "You are 'Sync', a high-end AI receptionist for a beauty salon. \n\
         You have full access to the calendar.\n\
         Speak briefly and elegantly in {}.\n\
         If booking, ALWAYS check availability first.",
        language.english_name()
    )
}

/// The first frame of a session: audio replies, receptionist persona, calendar tools.
pub fn build_setup(model: &str, language: Language) -> Setup {
    let model = if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    };
    Setup {
        model,
        generation_config: GenerationConfig::audio(),
        system_instruction: Content::text(system_instruction(language)),
        tools: vec![Tool {
            function_declarations: tool_declarations(),
        }],
    }
}

/// The answer to one function call, ready to send back and to show the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub id: String,
    pub name: String,
    pub result: String,
}

impl ToolOutcome {
    pub fn into_response(self) -> FunctionResponse {
        FunctionResponse {
            id: self.id,
            name: self.name,
            response: json!({ "result": self.result }),
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: &Value) -> Result<T, String> {
    serde_json::from_value(args.clone()).map_err(|err| format!("Error: invalid arguments ({})", err))
}

/// Runs one function call against the host's latest state.
pub async fn dispatch(host: &dyn ToolHost, call: &FunctionCall) -> ToolOutcome {
    let result = match call.name.as_str() {
        CHECK_AVAILABILITY => check(host, &call.args),
        BOOK_APPOINTMENT => book(host, &call.args).await,
        other => {
            warn!("Unknown tool call '{}'", other);
            UNKNOWN_TOOL_RESULT.to_string()
        }
    };
    ToolOutcome {
        id: call.id.clone(),
        name: call.name.clone(),
        result,
    }
}

fn check(host: &dyn ToolHost, args: &Value) -> String {
    let args: AvailabilityArgs = match parse_args(args) {
        Ok(args) => args,
        Err(message) => return message,
    };
    match parse_instant(&args.date, host.time_zone()) {
        Ok(at) => {
            let available = host.is_free(at);
            info!("Voice availability check for {}: {}", at, available);
            json!({ "available": available }).to_string()
        }
        Err(err) => format!("Error: {}", err),
    }
}

async fn book(host: &dyn ToolHost, args: &Value) -> String {
    let args: BookingArgs = match parse_args(args) {
        Ok(args) => args,
        Err(message) => return message,
    };
    let at = match parse_instant(&args.date, host.time_zone()) {
        Ok(at) => at,
        Err(err) => return format!("Error: {}", err),
    };
    match host.book(args.name.trim(), at).await {
        Ok(appointment) => {
            info!("Voice booking {} for {} at {}", appointment.id, args.name, at);
            BOOKING_CONFIRMED.to_string()
        }
        Err(err) => {
            error!("Voice booking failed: {}", err);
            SAVE_FAILED.to_string()
        }
    }
}
