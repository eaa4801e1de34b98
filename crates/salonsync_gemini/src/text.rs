//! Gemini text generation
//!
//! Two one-shot helpers run on `generateContent`: a Hungarian reminder SMS for
//! a single appointment and a short Hungarian analysis of a day's schedule.
//! Neither helper fails; the caller always gets a message to show.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use salonsync_common::http::client::HTTP_CLIENT;
use salonsync_common::i18n::UNKNOWN_SERVICE_NAME;
use salonsync_common::models::{Appointment, Service};
use salonsync_config::{GeminiConfig, SECRET_FROM_ENV};
use salonsync_schedule::catalog::find_service;
use salonsync_schedule::time::local_hhmm;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::GeminiError;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

pub const REMINDER_EMPTY: &str = "Nem sikerült az üzenet generálása.";
pub const REMINDER_FAILED: &str = "Hiba történt az AI kapcsolatban.";
pub const ANALYSIS_EMPTY: &str = "Nem sikerült elemezni a beosztást.";
pub const ANALYSIS_FAILED: &str = "Hiba történt az elemzés során.";

const HUNGARIAN_MONTHS: [&str; 12] = [
    "január",
    "február",
    "március",
    "április",
    "május",
    "június",
    "július",
    "augusztus",
    "szeptember",
    "október",
    "november",
    "december",
];

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// One row of the schedule handed to the analysis prompt.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub start: String,
    pub service: String,
    pub duration: u32,
}

/// Client for the `generateContent` endpoint
#[derive(Clone, Debug)]
pub struct GeminiTextClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiTextClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: HTTP_CLIENT.clone(),
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_TEXT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Builds a client from config. An empty or unresolved API key is an error.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let key = config.api_key.trim();
        if key.is_empty() || key == SECRET_FROM_ENV {
            return Err(GeminiError::ConfigError(
                "gemini.api_key is not set (GEMINI_API_KEY)".to_string(),
            ));
        }
        let mut client = Self::new(key);
        if let Some(base_url) = config.base_url.as_deref() {
            client = client.with_base_url(base_url);
        }
        if let Some(model) = config.text_model.as_deref() {
            client = client.with_model(model);
        }
        Ok(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a single user prompt and returns the trimmed text of the first
    /// candidate, or `None` when the model produced no text.
    pub async fn generate_content(&self, prompt: &str) -> Result<Option<String>, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("generateContent with model {}", self.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    /// Writes a short, polite Hungarian reminder SMS for one appointment.
    pub async fn generate_client_message(
        &self,
        client_name: &str,
        appointment_time: DateTime<Utc>,
        service_name: &str,
        tz: Tz,
    ) -> String {
        let prompt = reminder_prompt(
            client_name,
            &hungarian_datetime(appointment_time, tz),
            service_name,
        );
        match self.generate_content(&prompt).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                warn!("Empty reminder from Gemini");
                REMINDER_EMPTY.to_string()
            }
            Err(err) => {
                error!("Reminder generation failed: {}", err);
                REMINDER_FAILED.to_string()
            }
        }
    }

    /// Asks for three short Hungarian tips about the given schedule.
    pub async fn analyze_schedule(
        &self,
        appointments: &[Appointment],
        services: &[Service],
        tz: Tz,
    ) -> String {
        let entries = schedule_entries(appointments, services, tz);
        let json = match serde_json::to_string(&entries) {
            Ok(json) => json,
            Err(err) => {
                error!("Schedule serialization failed: {}", err);
                return ANALYSIS_FAILED.to_string();
            }
        };
        match self.generate_content(&analysis_prompt(&json)).await {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                warn!("Empty schedule analysis from Gemini");
                ANALYSIS_EMPTY.to_string()
            }
            Err(err) => {
                error!("Schedule analysis failed: {}", err);
                ANALYSIS_FAILED.to_string()
            }
        }
    }
}

/// Long Hungarian month, day and 24h time, e.g. `május 15. 09:30`.
pub fn hungarian_datetime(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    format!(
        "{} {}. {:02}:{:02}",
        HUNGARIAN_MONTHS[local.month0() as usize],
        local.day(),
        local.hour(),
        local.minute()
    )
}

pub fn reminder_prompt(client_name: &str, date_label: &str, service_name: &str) -> String {
    format!(
        "Írj egy rövid, kedves, professzionális emlékeztető SMS üzenetet magyarul egy fodrász nevében.\n\
         Vendég neve: {client_name}\n\
         Időpont: {date_label}\n\
         Szolgáltatás: {service_name}\n\
         \n\
         Az üzenet legyen közvetlen, de udvarias. Ne legyen túl hosszú.\n\
         Ne használj idézőjeleket az outputban."
    )
}

pub fn analysis_prompt(schedule_json: &str) -> String {
    format!(
        "Te egy profi szalon menedzser vagy. Elemezd a mai fodrász beosztást és adj 3 rövid tippet vagy összefoglalót magyarul.\n\
         \n\
         Mai beosztás:\n\
         {schedule_json}\n\
         \n\
         Fókuszálj a következőkre:\n\
         1. Mikor van nagyobb szünet (ebédszünet lehetőség)?\n\
         2. Mennyire sűrű a nap?\n\
         3. Van-e optimalizálási lehetőség?\n\
         \n\
         Formázd Markdown listaként."
    )
}

/// Local start time, service name and duration for each appointment.
/// Unknown services read as "Ismeretlen" with duration 0.
pub fn schedule_entries(
    appointments: &[Appointment],
    services: &[Service],
    tz: Tz,
) -> Vec<ScheduleEntry> {
    appointments
        .iter()
        .map(|appointment| {
            let service = find_service(services, appointment.service_id.as_deref());
            ScheduleEntry {
                start: local_hhmm(appointment.start_time, tz),
                service: service
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNKNOWN_SERVICE_NAME.to_string()),
                duration: service.map(|s| s.duration).unwrap_or(0),
            }
        })
        .collect()
}
