//! The uplink channel: one long-lived duplex session per call.
//!
//! [`GeminiLive`] opens a WebSocket to the generative-language
//! `BidiGenerateContent` endpoint and yields a [`GeminiLiveSession`]. The
//! session serializes outgoing audio frames and translates inbound messages
//! into [`LinkEvent`]s; everything above this module is transport-agnostic
//! through the [`LiveSession`] trait.

use crate::audio::AudioPacket;
use crate::config::{CallConfig, api_key_from_env};
use crate::error::{Result, VoiceError};
use crate::events::{ClientMessage, LinkEvent};
use async_trait::async_trait;
use base64::prelude::*;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, tungstenite::Message};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = futures::stream::SplitSink<WsStream, Message>;
type WsSource = futures::stream::SplitStream<WsStream>;

const LIVE_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";

/// A duplex voice session.
///
/// Send accepts one encoded frame at a time and enqueues transmission;
/// receive delivers inbound events as they arrive. `next_event` returns
/// `None` once the transport is gone.
#[async_trait]
pub trait LiveSession: Send + Sync {
    /// Get the session ID.
    fn session_id(&self) -> &str;

    /// Check if the session is currently connected.
    fn is_connected(&self) -> bool;

    /// Send one encoded audio frame.
    async fn send_frame(&self, frame: &AudioPacket) -> Result<()>;

    /// Get the next event from the remote endpoint.
    ///
    /// Returns `None` when the session is closed.
    async fn next_event(&self) -> Option<Result<LinkEvent>>;

    /// Close the session gracefully. Safe to call more than once.
    async fn close(&self) -> Result<()>;
}

/// A boxed session type for dynamic dispatch.
pub type BoxedLiveSession = Box<dyn LiveSession>;

/// Connector for the generative-language live endpoint.
#[derive(Debug, Clone)]
pub struct GeminiLive {
    api_key: String,
}

impl GeminiLive {
    /// Create a connector with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }

    /// Create a connector from the process environment.
    ///
    /// A missing credential does not fail here; the connect call will be
    /// rejected by the endpoint instead.
    pub fn from_env() -> Self {
        Self { api_key: api_key_from_env() }
    }

    /// Open a session and send the setup message.
    ///
    /// Resolves once the transport is established; the remote acknowledgment
    /// arrives later as [`LinkEvent::Opened`].
    pub async fn connect(&self, config: CallConfig) -> Result<GeminiLiveSession> {
        let url = format!("{}?key={}", LIVE_ENDPOINT, self.api_key);
        let request = url.into_client_request().map_err(|e| {
            VoiceError::connection(format!("Failed to create client request: {}", e))
        })?;
        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| VoiceError::connection(format!("WebSocket connect error: {}", e)))?;

        let (sink, source) = stream.split();

        let session = GeminiLiveSession {
            session_id: uuid::Uuid::new_v4().to_string(),
            connected: Arc::new(AtomicBool::new(true)),
            sender: Arc::new(Mutex::new(sink)),
            receiver: Arc::new(Mutex::new(source)),
        };

        tracing::info!(model_id = %config.model, session_id = %session.session_id, "Sending setup message");
        session.send_raw(&ClientMessage::setup(&config)).await?;

        Ok(session)
    }
}

/// Live voice session over a WebSocket.
pub struct GeminiLiveSession {
    session_id: String,
    connected: Arc<AtomicBool>,
    sender: Arc<Mutex<WsSink>>,
    receiver: Arc<Mutex<WsSource>>,
}

impl GeminiLiveSession {
    /// Send a raw message.
    async fn send_raw<T: Serialize>(&self, value: &T) -> Result<()> {
        let msg = serde_json::to_string(value)
            .map_err(|e| VoiceError::protocol(format!("JSON serialize error: {}", e)))?;

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Text(msg.into()))
            .await
            .map_err(|e| VoiceError::connection(format!("Send error: {}", e)))?;

        Ok(())
    }

    /// Receive and translate the next message.
    ///
    /// Untranslatable frames are skipped rather than surfaced, so a single
    /// malformed message never ends the call.
    async fn receive_raw(&self) -> Option<Result<LinkEvent>> {
        let mut receiver = self.receiver.lock().await;

        loop {
            match receiver.next().await {
                Some(Ok(Message::Text(text))) => match translate_server_message(&text) {
                    Some(event) => return Some(Ok(event)),
                    None => continue,
                },
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => match translate_server_message(&text) {
                        Some(event) => return Some(Ok(event)),
                        None => continue,
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping non-UTF-8 binary message");
                        continue;
                    }
                },
                Some(Ok(Message::Close(_))) => {
                    self.connected.store(false, Ordering::SeqCst);
                    return Some(Ok(LinkEvent::Closed));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.connected.store(false, Ordering::SeqCst);
                    return Some(Err(VoiceError::connection(format!("Receive error: {}", e))));
                }
                None => {
                    self.connected.store(false, Ordering::SeqCst);
                    return None;
                }
            }
        }
    }
}

#[async_trait]
impl LiveSession for GeminiLiveSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_frame(&self, frame: &AudioPacket) -> Result<()> {
        if !self.is_connected() {
            return Err(VoiceError::NotConnected);
        }
        self.send_raw(&ClientMessage::media(frame)).await
    }

    async fn next_event(&self) -> Option<Result<LinkEvent>> {
        self.receive_raw().await
    }

    async fn close(&self) -> Result<()> {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Close(None))
            .await
            .map_err(|e| VoiceError::connection(format!("Close error: {}", e)))?;

        Ok(())
    }
}

impl std::fmt::Debug for GeminiLiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiLiveSession")
            .field("session_id", &self.session_id)
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish()
    }
}

/// Translate one inbound server message into a [`LinkEvent`].
///
/// Returns `None` for messages that carry nothing actionable (unknown
/// shapes, undecodable payloads); those are logged and skipped.
pub(crate) fn translate_server_message(raw: &str) -> Option<LinkEvent> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unparseable server message");
            return None;
        }
    };

    if value.get("setupComplete").is_some() {
        return Some(LinkEvent::Opened);
    }

    if let Some(error) = value.get("error") {
        let reason = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unspecified server error")
            .to_string();
        return Some(LinkEvent::Error { reason });
    }

    if let Some(content) = value.get("serverContent") {
        if let Some(parts) = content.get("modelTurn").and_then(|t| t.get("parts")) {
            if let Some(parts_arr) = parts.as_array() {
                for part in parts_arr {
                    let Some(inline_data) = part.get("inlineData") else { continue };
                    let Some(data) = inline_data.get("data").and_then(|d| d.as_str()) else {
                        continue;
                    };
                    let decoded = match BASE64_STANDARD.decode(data) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            tracing::warn!(error = %e, "Skipping audio chunk with invalid base64");
                            continue;
                        }
                    };
                    let media_type = inline_data
                        .get("mimeType")
                        .and_then(|m| m.as_str())
                        .unwrap_or("audio/pcm;rate=24000")
                        .to_string();
                    return Some(LinkEvent::Audio { data: decoded, media_type });
                }
            }
        }

        if content.get("turnComplete").and_then(|t| t.as_bool()).unwrap_or(false) {
            return Some(LinkEvent::TurnComplete);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_setup_complete() {
        assert_eq!(translate_server_message(r#"{"setupComplete":{}}"#), Some(LinkEvent::Opened));
    }

    #[test]
    fn test_translate_audio_chunk() {
        let raw = r#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        {"inlineData": {"mimeType": "audio/pcm;rate=24000", "data": "aGVsbG8="}}
                    ]
                }
            }
        }"#;
        match translate_server_message(raw) {
            Some(LinkEvent::Audio { data, media_type }) => {
                assert_eq!(data, b"hello");
                assert_eq!(media_type, "audio/pcm;rate=24000");
            }
            other => panic!("Expected Audio event, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_turn_complete() {
        let raw = r#"{"serverContent": {"turnComplete": true}}"#;
        assert_eq!(translate_server_message(raw), Some(LinkEvent::TurnComplete));
    }

    #[test]
    fn test_translate_server_error() {
        let raw = r#"{"error": {"code": 400, "message": "quota exceeded"}}"#;
        assert_eq!(
            translate_server_message(raw),
            Some(LinkEvent::Error { reason: "quota exceeded".to_string() })
        );
    }

    #[test]
    fn test_translate_skips_malformed_json() {
        assert_eq!(translate_server_message("not json at all"), None);
    }

    #[test]
    fn test_translate_skips_invalid_base64_chunk() {
        let raw = r#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [{"inlineData": {"mimeType": "audio/pcm", "data": "!!!"}}]
                }
            }
        }"#;
        assert_eq!(translate_server_message(raw), None);
    }

    #[test]
    fn test_translate_ignores_unknown_shape() {
        assert_eq!(translate_server_message(r#"{"usageMetadata": {"tokens": 3}}"#), None);
    }
}
