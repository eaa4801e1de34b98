use chrono::{TimeZone, Utc};
use salonsync_common::models::NewAppointment;
use salonsync_gemini::text::{
    ANALYSIS_EMPTY, ANALYSIS_FAILED, REMINDER_EMPTY, REMINDER_FAILED,
};
use salonsync_gemini::GeminiTextClient;
use salonsync_schedule::time::DEFAULT_TIME_ZONE;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiTextClient {
    GeminiTextClient::new("test-key").with_base_url(&server.uri())
}

fn answer(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_reminder_uses_prompt_and_trims() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("Vendég neve: Anna"))
        .and(body_string_contains("május 15. 10:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(
            "  Kedves Anna! Várunk május 15-én 10:00-kor.\n",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let message = client_for(&server)
        .generate_client_message(
            "Anna",
            Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap(),
            "Festés",
            DEFAULT_TIME_ZONE,
        )
        .await;
    assert_eq!(message, "Kedves Anna! Várunk május 15-én 10:00-kor.");
}

#[tokio::test]
async fn test_reminder_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "internal", "status": "INTERNAL" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let at = Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap();
    assert_eq!(
        client
            .generate_client_message("Anna", at, "Festés", DEFAULT_TIME_ZONE)
            .await,
        REMINDER_EMPTY
    );
    assert_eq!(
        client
            .generate_client_message("Anna", at, "Festés", DEFAULT_TIME_ZONE)
            .await,
        REMINDER_FAILED
    );
}

#[tokio::test]
async fn test_analysis_embeds_compact_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains(
            r#"[{\"start\":\"10:00\",\"service\":\"Ismeretlen\",\"duration\":0}]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("Három tipp.")))
        .expect(1)
        .mount(&server)
        .await;

    let appointment = NewAppointment::voice_booking(
        "Kata",
        Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap(),
    )
    .into_appointment("a1".to_string());
    let summary = client_for(&server)
        .analyze_schedule(&[appointment], &[], DEFAULT_TIME_ZONE)
        .await;
    assert_eq!(summary, "Három tipp.");
}

#[tokio::test]
async fn test_analysis_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer("   ")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.analyze_schedule(&[], &[], DEFAULT_TIME_ZONE).await,
        ANALYSIS_EMPTY
    );
    assert_eq!(
        client.analyze_schedule(&[], &[], DEFAULT_TIME_ZONE).await,
        ANALYSIS_FAILED
    );
}

#[tokio::test]
async fn test_api_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate_content("hello")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Gemini API error (400): API key not valid.");
}
