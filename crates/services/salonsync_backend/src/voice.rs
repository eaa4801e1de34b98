//! Browser <-> Gemini Live bridge at `/voice/session`.
//!
//! The browser streams binary frames of 16 kHz f32 little-endian samples and
//! may send `{"type":"stop"}`. The bridge answers with JSON events:
//! `ready`, `audio`, `tool`, `turn_complete`, `interrupted`, `error` and
//! finally `closed`. Tool calls run against the live schedule.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use salonsync_common::error::{unavailable, SalonSyncError};
use salonsync_gemini::audio::{decode_output, f32_from_le_bytes, PlaybackScheduler};
use salonsync_gemini::protocol::LiveEvent;
use salonsync_gemini::{build_setup, connect, dispatch, LiveConfig, LiveReceiver, LiveSender, VoiceError};
use salonsync_schedule::ScheduleState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct VoiceState {
    pub schedule: Arc<ScheduleState>,
    /// `None` disables the bridge.
    pub live: Option<LiveConfig>,
}

/// Events sent to the browser.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    Ready {
        locale: String,
    },
    /// Base64 16-bit PCM at 24 kHz, placed on the session clock in seconds.
    Audio {
        data: String,
        start: f64,
        duration: f64,
    },
    Tool {
        name: String,
        result: String,
    },
    TurnComplete,
    Interrupted,
    Error {
        message: String,
    },
    Closed,
}

/// Commands the browser may send as text frames.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserCommand {
    Stop,
}

#[derive(Error, Debug)]
enum BridgeError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error("Browser connection error: {0}")]
    Browser(#[from] axum::Error),
}

type BrowserSink = SplitSink<WebSocket, Message>;

pub fn routes(state: Arc<VoiceState>) -> Router {
    Router::new()
        .route("/voice/session", get(voice_session_handler))
        .with_state(state)
}

async fn voice_session_handler(
    State(state): State<Arc<VoiceState>>,
    ws: WebSocketUpgrade,
) -> Result<Response, SalonSyncError> {
    let live = state
        .live
        .clone()
        .ok_or_else(|| unavailable("Voice assistant is not configured"))?;
    Ok(ws.on_upgrade(move |socket| run_session(socket, state, live)))
}

async fn send_event(sink: &mut BrowserSink, event: &BridgeEvent) -> Result<(), BridgeError> {
    let json = serde_json::to_string(event).map_err(VoiceError::from)?;
    sink.send(Message::Text(json.into())).await?;
    Ok(())
}

async fn run_session(socket: WebSocket, state: Arc<VoiceState>, live: LiveConfig) {
    let (mut browser_tx, mut browser_rx) = socket.split();
    let settings = state.schedule.settings.get();

    let (upstream_tx, mut upstream_rx) =
        match connect(&live, build_setup(&live.model, settings.language)).await {
            Ok(halves) => halves,
            Err(err) => {
                error!("Could not open Live session: {}", err);
                let _ = send_event(
                    &mut browser_tx,
                    &BridgeEvent::Error {
                        message: err.to_string(),
                    },
                )
                .await;
                let _ = send_event(&mut browser_tx, &BridgeEvent::Closed).await;
                let _ = browser_tx.close().await;
                return;
            }
        };
    info!("Voice session started ({})", settings.language.code());

    let upstream_tx = Mutex::new(upstream_tx);
    let ready = BridgeEvent::Ready {
        locale: settings.language.speech_locale().to_string(),
    };

    let outcome = match send_event(&mut browser_tx, &ready).await {
        Ok(()) => {
            let browser_to_model = forward_microphone(&mut browser_rx, &upstream_tx);
            let model_to_browser =
                forward_model(&mut upstream_rx, &upstream_tx, &mut browser_tx, &state.schedule);
            tokio::select! {
                result = browser_to_model => result,
                result = model_to_browser => result,
            }
        }
        Err(err) => Err(err),
    };

    if let Err(err) = outcome {
        warn!("Voice session ended with error: {}", err);
        let _ = send_event(
            &mut browser_tx,
            &BridgeEvent::Error {
                message: err.to_string(),
            },
        )
        .await;
    }
    if let Err(err) = upstream_tx.lock().await.close().await {
        debug!("Closing Live session: {}", err);
    }
    let _ = send_event(&mut browser_tx, &BridgeEvent::Closed).await;
    let _ = browser_tx.close().await;
    info!("Voice session closed");
}

/// Microphone frames up to the model until the browser stops or disconnects.
async fn forward_microphone(
    browser_rx: &mut futures_util::stream::SplitStream<WebSocket>,
    upstream_tx: &Mutex<LiveSender>,
) -> Result<(), BridgeError> {
    while let Some(frame) = browser_rx.next().await {
        match frame? {
            Message::Binary(bytes) => match f32_from_le_bytes(&bytes) {
                Ok(samples) => upstream_tx.lock().await.send_audio(&samples).await?,
                Err(err) => warn!("Dropping microphone frame: {}", err),
            },
            Message::Text(text) => match serde_json::from_str::<BrowserCommand>(text.as_str()) {
                Ok(BrowserCommand::Stop) => {
                    debug!("Browser stopped the voice session");
                    return Ok(());
                }
                Err(err) => warn!("Ignoring browser message: {}", err),
            },
            Message::Close(_) => return Ok(()),
            _ => {}
        }
    }
    Ok(())
}

/// Model events down to the browser; tool calls are answered in order.
async fn forward_model(
    upstream_rx: &mut LiveReceiver,
    upstream_tx: &Mutex<LiveSender>,
    browser_tx: &mut BrowserSink,
    schedule: &ScheduleState,
) -> Result<(), BridgeError> {
    let clock = Instant::now();
    let mut playback = PlaybackScheduler::new();

    while let Some(event) = upstream_rx.next_event().await {
        match event? {
            LiveEvent::Audio(data) => {
                let samples = match decode_output(&data) {
                    Ok(samples) => samples,
                    Err(err) => {
                        warn!("Dropping model audio: {}", err);
                        continue;
                    }
                };
                let chunk = playback.schedule(clock.elapsed().as_secs_f64(), samples.len());
                send_event(
                    browser_tx,
                    &BridgeEvent::Audio {
                        data,
                        start: chunk.start,
                        duration: chunk.duration,
                    },
                )
                .await?;
            }
            LiveEvent::ToolCall(calls) => {
                let mut responses = Vec::with_capacity(calls.len());
                for call in &calls {
                    let outcome = dispatch(schedule, call).await;
                    send_event(
                        browser_tx,
                        &BridgeEvent::Tool {
                            name: outcome.name.clone(),
                            result: outcome.result.clone(),
                        },
                    )
                    .await?;
                    responses.push(outcome.into_response());
                }
                upstream_tx
                    .lock()
                    .await
                    .send_tool_responses(responses)
                    .await?;
            }
            LiveEvent::ToolCallCancelled(ids) => {
                debug!("Model cancelled tool calls {:?}", ids);
            }
            LiveEvent::Interrupted => {
                playback.reset();
                send_event(browser_tx, &BridgeEvent::Interrupted).await?;
            }
            LiveEvent::TurnComplete => {
                send_event(browser_tx, &BridgeEvent::TurnComplete).await?;
            }
            LiveEvent::SetupComplete => {}
        }
    }
    debug!("Live session closed by the model");
    Ok(())
}
