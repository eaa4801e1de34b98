use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use salonsync_common::models::Language;
use salonsync_gemini::audio::INPUT_MIME_TYPE;
use salonsync_gemini::protocol::{FunctionResponse, LiveEvent};
use salonsync_gemini::{build_setup, connect, LiveConfig, VoiceError};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{accept_async, accept_hdr_async};
use tokio_tungstenite::tungstenite::Message;

async fn listener() -> (TcpListener, LiveConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = LiveConfig {
        url: format!("ws://{}", listener.local_addr().unwrap()),
        api_key: "test-key".to_string(),
        model: "live-model".to_string(),
    };
    (listener, config)
}

fn text(value: Value) -> Message {
    Message::Text(value.to_string().into())
}

fn parse(message: &Message) -> Value {
    serde_json::from_str(message.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn test_session_handshake_audio_and_tools() {
    let (listener, config) = listener().await;

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_hdr_async(
            stream,
            |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                assert_eq!(request.uri().to_string(), "/?key=test-key");
                Ok(response)
            },
        )
        .await
        .unwrap();

        let setup = parse(&ws.next().await.unwrap().unwrap());
        assert_eq!(setup["setup"]["model"], json!("models/live-model"));
        ws.send(text(json!({ "setupComplete": {} }))).await.unwrap();

        let input = parse(&ws.next().await.unwrap().unwrap());
        assert_eq!(
            input["realtimeInput"]["mediaChunks"][0]["mimeType"],
            json!(INPUT_MIME_TYPE)
        );

        // Binary frames carry the same JSON
        ws.send(Message::Binary(
            json!({ "serverContent": { "modelTurn": { "parts": [
                { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AAA=" } }
            ] } } })
            .to_string()
            .into_bytes()
            .into(),
        ))
        .await
        .unwrap();
        ws.send(text(json!({ "toolCall": { "functionCalls": [
            { "id": "f1", "name": "check_availability", "args": { "date": "2025-05-15T10:00" } }
        ] } })))
        .await
        .unwrap();

        let answer = parse(&ws.next().await.unwrap().unwrap());
        assert_eq!(
            answer["toolResponse"]["functionResponses"][0],
            json!({ "id": "f1", "name": "check_availability", "response": { "result": "{\"available\":true}" } })
        );
        ws.send(text(json!({ "serverContent": { "turnComplete": true } })))
            .await
            .unwrap();
        ws.close(None).await.unwrap();
    });

    let (mut sender, mut receiver) = connect(&config, build_setup(&config.model, Language::Hu))
        .await
        .unwrap();
    sender.send_audio(&[0.0, 0.25, -0.25]).await.unwrap();

    assert_eq!(
        receiver.next_event().await.unwrap().unwrap(),
        LiveEvent::Audio("AAA=".to_string())
    );
    match receiver.next_event().await.unwrap().unwrap() {
        LiveEvent::ToolCall(calls) => assert_eq!(calls[0].name, "check_availability"),
        other => panic!("unexpected event: {:?}", other),
    }
    sender
        .send_tool_responses(vec![FunctionResponse {
            id: "f1".to_string(),
            name: "check_availability".to_string(),
            response: json!({ "result": "{\"available\":true}" }),
        }])
        .await
        .unwrap();
    assert_eq!(
        receiver.next_event().await.unwrap().unwrap(),
        LiveEvent::TurnComplete
    );
    assert!(receiver.next_event().await.is_none());

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_session_closed_before_setup() {
    let (listener, config) = listener().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let _setup = ws.next().await;
        ws.close(None).await.unwrap();
    });

    let result = connect(&config, build_setup(&config.model, Language::En)).await;
    assert!(matches!(result, Err(VoiceError::SetupIncomplete)));
}
