//! # filo-voice
//!
//! Real-time voice call pipeline for the FILO wellness companion.
//!
//! ## Architecture
//!
//! Four cooperating pieces, with [`CallSession`] as the only holder of
//! explicit state transitions:
//!
//! ```text
//!  microphone ──► CaptureStage ──► LiveSession ──► remote model
//!                 (encode PCM16)    (uplink)            │
//!                                                       ▼
//!  audio out ◄── PlaybackScheduler ◄────────── LiveSession (downlink)
//!                (decode + sequence)
//!
//!           CallSession wraps acquisition and release around the flow
//! ```
//!
//! Packets arrive at irregular network intervals; the scheduler derives each
//! start time from the cumulative end of everything scheduled before it
//! (`max(next_start, now)`), so speech renders gap-free without overlap.
//! Teardown is idempotent and runs on hang-up, remote close, and failure
//! alike.
//!
//! ## Example
//!
//! ```rust,ignore
//! use filo_voice::{CallConfig, CallSession, GeminiLive};
//!
//! let connector = GeminiLive::from_env();
//! let config = CallConfig::new()
//!     .with_instruction("You are FILO, an empathetic wellness companion.");
//!
//! let session = CallSession::dial(&connector, config).await?;
//! let call = session.clone();
//! tokio::spawn(async move { call.run().await });
//!
//! // ... user taps the mute button ...
//! session.toggle_mute();
//!
//! // ... user hangs up ...
//! session.hang_up().await;
//! ```

pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod events;
pub mod link;
pub mod playback;
pub mod session;

// Re-exports
pub use audio::{AudioFormat, AudioPacket};
pub use capture::{AudioSource, BoxedAudioSource, CaptureStage, MicSource};
pub use config::{CallConfig, DEFAULT_CALL_MODEL, api_key_from_env};
pub use error::{Result, VoiceError};
pub use events::LinkEvent;
pub use link::{BoxedLiveSession, GeminiLive, GeminiLiveSession, LiveSession};
pub use playback::{
    AudioClock, AudioOut, BoxedAudioOut, MonotonicClock, PlaybackScheduler, PlaybackUnit,
    SpeakerOut,
};
pub use session::{CallPhase, CallSession};
