//! Error types for the voice session pipeline.

use thiserror::Error;

/// Result type for voice session operations.
pub type Result<T> = std::result::Result<T, VoiceError>;

/// Errors that can occur during a voice call.
#[derive(Error, Debug)]
pub enum VoiceError {
    /// WebSocket connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed protocol message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Session not connected.
    #[error("Session not connected")]
    NotConnected,

    /// Session already closed.
    #[error("Session already closed")]
    SessionClosed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Audio format error.
    #[error("Audio format error: {0}")]
    AudioFormat(String),

    /// Microphone acquisition or capture error.
    #[error("Capture error: {0}")]
    Capture(String),

    /// Audio output error.
    #[error("Playback error: {0}")]
    Playback(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceError {
    /// Create a new connection error.
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new protocol error.
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new audio format error.
    pub fn audio<S: Into<String>>(msg: S) -> Self {
        Self::AudioFormat(msg.into())
    }

    /// Create a new capture error.
    pub fn capture<S: Into<String>>(msg: S) -> Self {
        Self::Capture(msg.into())
    }

    /// Create a new playback error.
    pub fn playback<S: Into<String>>(msg: S) -> Self {
        Self::Playback(msg.into())
    }
}
