//! Configuration types for voice call sessions.

use crate::audio::AudioFormat;
use serde::{Deserialize, Serialize};

/// Default live model used for calls.
pub const DEFAULT_CALL_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-12-2025";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "FILO_API_KEY";

/// Fallback environment variable for the API credential.
pub const API_KEY_ENV_FALLBACK: &str = "GOOGLE_API_KEY";

/// Read the API credential from the process environment.
///
/// An absent credential yields an empty string rather than an error: client
/// construction never blocks on configuration, the first network call fails
/// instead.
pub fn api_key_from_env() -> String {
    std::env::var(API_KEY_ENV)
        .or_else(|_| std::env::var(API_KEY_ENV_FALLBACK))
        .unwrap_or_default()
}

/// Configuration for a voice call session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallConfig {
    /// Live model to use.
    pub model: String,

    /// System instruction for the companion persona.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,

    /// Voice to use for audio output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Temperature for response generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Microphone uplink format.
    pub input_format: AudioFormat,

    /// Synthesized-speech downlink format.
    pub output_format: AudioFormat,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CALL_MODEL.to_string(),
            instruction: None,
            voice: None,
            temperature: None,
            input_format: AudioFormat::pcm16_16khz(),
            output_format: AudioFormat::pcm16_24khz(),
        }
    }
}

impl CallConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}
