//! Client side of a Gemini Live session.
//!
//! [`connect`] opens the WebSocket, sends the setup frame and waits for
//! `setupComplete`. The two halves it returns can then be driven from
//! separate tasks: [`LiveSender`] streams microphone audio and tool answers,
//! [`LiveReceiver`] yields decoded server events.

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use salonsync_config::GeminiConfig;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::audio::encode_input;
use crate::error::VoiceError;
use crate::protocol::{
    ClientMessage, FunctionResponse, LiveEvent, MediaChunk, RealtimeInput, ServerMessage, Setup,
    ToolResponse,
};

pub const DEFAULT_LIVE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
pub const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-09-2025";

const SETUP_TIMEOUT: Duration = Duration::from_secs(15);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Clone, Debug)]
pub struct LiveConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

impl LiveConfig {
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self {
            url: config
                .live_url
                .clone()
                .unwrap_or_else(|| DEFAULT_LIVE_URL.to_string()),
            api_key: config.api_key.clone(),
            model: config
                .live_model
                .clone()
                .unwrap_or_else(|| DEFAULT_LIVE_MODEL.to_string()),
        }
    }

    /// The socket URL with the API key appended as a `key` query pair.
    pub fn endpoint(&self) -> Result<Url, VoiceError> {
        let mut url = Url::parse(&self.url)?;
        if url.path().is_empty() {
            url.set_path("/");
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Write half of a Live session.
pub struct LiveSender {
    sink: SplitSink<WsStream, Message>,
}

impl LiveSender {
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), VoiceError> {
        let json = serde_json::to_string(message)?;
        self.sink.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Streams one block of 16 kHz microphone samples.
    pub async fn send_audio(&mut self, samples: &[f32]) -> Result<(), VoiceError> {
        if samples.is_empty() {
            return Ok(());
        }
        self.send(&ClientMessage::RealtimeInput(RealtimeInput {
            media_chunks: vec![MediaChunk::pcm(encode_input(samples))],
        }))
        .await
    }

    pub async fn send_tool_responses(
        &mut self,
        function_responses: Vec<FunctionResponse>,
    ) -> Result<(), VoiceError> {
        self.send(&ClientMessage::ToolResponse(ToolResponse { function_responses }))
            .await
    }

    pub async fn close(&mut self) -> Result<(), VoiceError> {
        self.sink.close().await?;
        Ok(())
    }
}

/// Read half of a Live session.
pub struct LiveReceiver {
    stream: SplitStream<WsStream>,
    pending: VecDeque<LiveEvent>,
}

impl LiveReceiver {
    /// Next server event. `None` once the server closed the session.
    pub async fn next_event(&mut self) -> Option<Result<LiveEvent, VoiceError>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            let frame = match self.stream.next().await? {
                Ok(frame) => frame,
                Err(err) => return Some(Err(err.into())),
            };
            let text = match frame {
                Message::Text(text) => text.to_string(),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => text,
                    Err(_) => {
                        warn!("Dropping non UTF-8 binary frame from Live session");
                        continue;
                    }
                },
                Message::Close(frame) => {
                    debug!("Live session closed by server: {:?}", frame);
                    return None;
                }
                _ => continue,
            };
            match serde_json::from_str::<ServerMessage>(&text) {
                Ok(message) => self.pending.extend(message.into_events()),
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn wait_for_setup(&mut self) -> Result<(), VoiceError> {
        while let Some(event) = self.next_event().await {
            if event? == LiveEvent::SetupComplete {
                return Ok(());
            }
        }
        Err(VoiceError::SetupIncomplete)
    }
}

/// Opens a session and completes the setup handshake.
pub async fn connect(
    config: &LiveConfig,
    setup: Setup,
) -> Result<(LiveSender, LiveReceiver), VoiceError> {
    info!("Opening Live session with {}", setup.model);
    let (ws, _) = connect_async(config.endpoint()?.as_str()).await?;
    let (sink, stream) = ws.split();
    let mut sender = LiveSender { sink };
    let mut receiver = LiveReceiver {
        stream,
        pending: VecDeque::new(),
    };

    sender.send(&ClientMessage::Setup(setup)).await?;
    tokio::time::timeout(SETUP_TIMEOUT, receiver.wait_for_setup())
        .await
        .map_err(|_| VoiceError::Timeout("setupComplete"))??;
    debug!("Live session ready");

    Ok((sender, receiver))
}
