//! Wire message types and the unified session event.
//!
//! Client messages follow the generative-language `BidiGenerateContent`
//! schema (camelCase JSON). Inbound server messages are translated into the
//! tagged [`LinkEvent`] type at the transport boundary, so the rest of the
//! pipeline never sees loose JSON shapes.

use crate::audio::AudioPacket;
use crate::config::CallConfig;
use serde::Serialize;
use serde_json::{Value, json};

// ── Client messages ─────────────────────────────────────────────────────

/// Top-level client message envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    setup: Option<Setup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    realtime_input: Option<RealtimeInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Setup {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeInput {
    media_chunks: Vec<MediaChunk>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MediaChunk {
    mime_type: String,
    data: String,
}

impl ClientMessage {
    /// Build the one-time session setup message.
    pub(crate) fn setup(config: &CallConfig) -> Self {
        let mut generation_config = json!({
            "responseModalities": ["AUDIO"],
        });

        if let Some(voice) = &config.voice {
            generation_config["speechConfig"] = json!({
                "voiceConfig": {
                    "prebuiltVoiceConfig": {
                        "voiceName": voice
                    }
                }
            });
        }

        if let Some(temp) = config.temperature {
            generation_config["temperature"] = json!(temp);
        }

        let system_instruction = config.instruction.clone().map(|text| Content {
            parts: vec![TextPart { text }],
        });

        Self {
            setup: Some(Setup {
                model: config.model.clone(),
                system_instruction,
                generation_config: Some(generation_config),
            }),
            realtime_input: None,
        }
    }

    /// Wrap one encoded audio frame for transmission.
    pub(crate) fn media(frame: &AudioPacket) -> Self {
        Self {
            setup: None,
            realtime_input: Some(RealtimeInput {
                media_chunks: vec![MediaChunk {
                    mime_type: frame.format.media_type(),
                    data: frame.to_base64(),
                }],
            }),
        }
    }
}

// ── Unified session events ──────────────────────────────────────────────

/// Events surfaced by the uplink channel, one tagged variant per inbound
/// message kind. Dispatched via exhaustive matching in the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The remote endpoint acknowledged the session setup.
    Opened,
    /// One chunk of synthesized audio with its declared media type.
    Audio {
        /// Raw PCM bytes, already decoded from base64.
        data: Vec<u8>,
        /// Declared media type, e.g. `audio/pcm;rate=24000`.
        media_type: String,
    },
    /// The model finished its current turn.
    TurnComplete,
    /// The remote endpoint closed the session.
    Closed,
    /// The remote endpoint reported an error.
    Error {
        /// Human-readable reason.
        reason: String,
    },
}
