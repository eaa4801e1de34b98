use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use salonsync_backend::{build_app, AppState};
use salonsync_common::models::{AppSettings, VOICE_CLIENT_ID};
use salonsync_common::services::AppointmentStore;
use salonsync_common::MemoryStore;
use salonsync_config::AppConfig;
use salonsync_gemini::LiveConfig;
use salonsync_schedule::time::DEFAULT_TIME_ZONE;
use salonsync_schedule::{ScheduleState, SettingsHandle};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, connect_async};

async fn serve(live: Option<LiveConfig>) -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let schedule = Arc::new(ScheduleState::new(
        SettingsHandle::new(AppSettings::default()),
        store.clone(),
        DEFAULT_TIME_ZONE,
    ));
    let state = AppState::from_parts(Arc::new(AppConfig::default()), schedule, None, live, None);
    let app = build_app(&state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{}/api/voice/session", addr), store)
}

fn text(value: Value) -> Message {
    Message::Text(value.to_string().into())
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("message in time")
            .expect("stream open")
            .unwrap();
        if message.is_text() {
            return serde_json::from_str(message.to_text().unwrap()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_voice_booking_round_trip() {
    let live_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let live = LiveConfig {
        url: format!("ws://{}", live_listener.local_addr().unwrap()),
        api_key: "test-key".to_string(),
        model: "live-model".to_string(),
    };

    let fake_model = tokio::spawn(async move {
        let (stream, _) = live_listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let setup = next_json(&mut ws).await;
        assert!(setup["setup"]["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("in Hungarian."));
        ws.send(text(json!({ "setupComplete": {} }))).await.unwrap();

        let input = next_json(&mut ws).await;
        assert!(input["realtimeInput"]["mediaChunks"][0]["data"].is_string());
        ws.send(text(json!({ "toolCall": { "functionCalls": [{
            "id": "f1",
            "name": "book_appointment",
            "args": { "date": "2025-05-15T14:00", "name": "Kata" }
        }] } })))
        .await
        .unwrap();

        let answer = next_json(&mut ws).await;
        assert_eq!(
            answer["toolResponse"]["functionResponses"][0]["response"]["result"],
            json!("Appointment confirmed.")
        );
        ws.send(text(json!({ "serverContent": {
            "modelTurn": { "parts": [{ "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AAAAAA==" } }] },
            "turnComplete": true
        } })))
        .await
        .unwrap();

        // Runs until the bridge closes the upstream session
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
    });

    let (url, store) = serve(Some(live)).await;
    let (mut browser, _) = connect_async(url).await.unwrap();

    assert_eq!(
        next_json(&mut browser).await,
        json!({ "type": "ready", "locale": "hu-HU" })
    );

    let frame: Vec<u8> = [0.1f32, -0.1, 0.2, -0.2]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    browser.send(Message::Binary(frame.into())).await.unwrap();

    assert_eq!(
        next_json(&mut browser).await,
        json!({ "type": "tool", "name": "book_appointment", "result": "Appointment confirmed." })
    );
    let audio = next_json(&mut browser).await;
    assert_eq!(audio["type"], json!("audio"));
    assert_eq!(audio["data"], json!("AAAAAA=="));
    assert_eq!(audio["duration"].as_f64().unwrap(), 2.0 / 24_000.0);
    assert_eq!(next_json(&mut browser).await, json!({ "type": "turn_complete" }));

    browser.send(text(json!({ "type": "stop" }))).await.unwrap();
    assert_eq!(next_json(&mut browser).await, json!({ "type": "closed" }));

    tokio::time::timeout(Duration::from_secs(5), fake_model)
        .await
        .unwrap()
        .unwrap();

    let booked = store.list_appointments().await.unwrap();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].client_id, VOICE_CLIENT_ID);
    assert_eq!(booked[0].client_name.as_deref(), Some("Kata"));
    assert_eq!(booked[0].start_time.to_rfc3339(), "2025-05-15T12:00:00+00:00");
}

#[tokio::test]
async fn test_voice_session_unavailable_without_key() {
    let (url, _store) = serve(None).await;
    match connect_async(url).await {
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), 503)
        }
        other => panic!("expected HTTP 503, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_voice_session_reports_upstream_failure() {
    // Nothing listens here, so the Live connection fails
    let unused = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let live = LiveConfig {
        url: format!("ws://{}", unused.local_addr().unwrap()),
        api_key: "k".to_string(),
        model: "m".to_string(),
    };
    drop(unused);

    let (url, _store) = serve(Some(live)).await;
    let (mut browser, _) = connect_async(url).await.unwrap();
    assert_eq!(next_json(&mut browser).await["type"], json!("error"));
    assert_eq!(next_json(&mut browser).await, json!({ "type": "closed" }));
}
