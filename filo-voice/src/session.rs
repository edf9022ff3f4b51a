//! Call session lifecycle management.
//!
//! [`CallSession`] is the only component with explicit state transitions.
//! It exclusively owns the session state (mute flag, playback scheduler,
//! phase) and wraps acquisition and release around the
//! capture → uplink → playback flow. Teardown is idempotent: hang-up, a
//! remote close, and a transport failure all converge on the same release
//! path, and racing invocations release everything exactly once.

use crate::audio::{AudioFormat, AudioPacket};
use crate::capture::{AudioSource, CaptureStage, MicSource};
use crate::config::CallConfig;
use crate::error::{Result, VoiceError};
use crate::events::LinkEvent;
use crate::link::{GeminiLive, LiveSession};
use crate::playback::{AudioClock, AudioOut, MonotonicClock, PlaybackScheduler, SpeakerOut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Call phase.
///
/// `Listening` and `Speaking` are both "open"; the split is a status label
/// driven by whether the active-playback set is non-empty, with no other
/// functional difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Waiting for the remote endpoint to acknowledge the session.
    Connecting,
    /// Open; the model is not speaking.
    Listening,
    /// Open; synthesized speech is playing.
    Speaking,
    /// Ended normally (local hang-up or remote close).
    Closed,
    /// Ended by an acquisition or transport failure.
    Error,
}

impl CallPhase {
    /// Whether the call has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Error)
    }

    /// User-visible status string.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Listening => "listening",
            Self::Speaking => "speaking",
            Self::Closed => "closed",
            Self::Error => "error",
        }
    }
}

struct SessionInner {
    link: Box<dyn LiveSession>,
    mic: Box<dyn AudioSource>,
    out: Box<dyn AudioOut>,
    clock: Box<dyn AudioClock>,
    capture: CaptureStage,
    scheduler: parking_lot::Mutex<PlaybackScheduler>,
    muted: AtomicBool,
    released: AtomicBool,
    phase_tx: watch::Sender<CallPhase>,
}

/// One voice call.
///
/// Cheap to clone; all clones drive the same underlying session.
#[derive(Clone)]
pub struct CallSession {
    inner: Arc<SessionInner>,
}

impl CallSession {
    /// Wire a session from already-acquired parts.
    ///
    /// The session starts in [`CallPhase::Connecting`]; [`run`](Self::run)
    /// drives it from there.
    pub fn new(
        link: Box<dyn LiveSession>,
        mic: Box<dyn AudioSource>,
        out: Box<dyn AudioOut>,
        clock: Box<dyn AudioClock>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(CallPhase::Connecting);
        Self {
            inner: Arc::new(SessionInner {
                link,
                mic,
                out,
                clock,
                capture: CaptureStage::new(AudioFormat::pcm16_16khz()),
                scheduler: parking_lot::Mutex::new(PlaybackScheduler::new()),
                muted: AtomicBool::new(false),
                released: AtomicBool::new(false),
                phase_tx,
            }),
        }
    }

    /// Acquire the microphone and speaker, open the uplink, and wire a
    /// session.
    ///
    /// Acquisition failures surface as `Err`; parts acquired before the
    /// failure are released by drop.
    pub async fn dial(connector: &GeminiLive, config: CallConfig) -> Result<Self> {
        let mic = MicSource::open(&config.input_format)?;
        let out = SpeakerOut::open()?;
        let link = connector.connect(config).await?;
        Ok(Self::new(
            Box::new(link),
            Box::new(mic),
            Box::new(out),
            Box::new(MonotonicClock::new()),
        ))
    }

    /// Current call phase.
    pub fn phase(&self) -> CallPhase {
        *self.inner.phase_tx.borrow()
    }

    /// Subscribe to phase changes.
    pub fn watch_phase(&self) -> watch::Receiver<CallPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Whether the mute flag is set.
    pub fn is_muted(&self) -> bool {
        self.inner.muted.load(Ordering::SeqCst)
    }

    /// Flip the mute flag.
    ///
    /// A pure flag flip: the capture stage keeps running and the microphone
    /// stays acquired, only frame forwarding is suppressed, so unmute is
    /// instant.
    pub fn set_muted(&self, muted: bool) {
        self.inner.muted.store(muted, Ordering::SeqCst);
    }

    /// Toggle mute, returning the new value.
    pub fn toggle_mute(&self) -> bool {
        !self.inner.muted.fetch_xor(true, Ordering::SeqCst)
    }

    /// Drive the call until it ends.
    ///
    /// Spawns the capture-forwarding pump and processes downlink events on
    /// this task. Resolves `Ok` on a clean close and `Err` on a transport
    /// failure; teardown has completed either way.
    pub async fn run(&self) -> Result<()> {
        let uplink = {
            let session = self.clone();
            tokio::spawn(async move { session.pump_uplink().await })
        };

        let result = self.pump_downlink().await;

        // The pump exits on its own once teardown stops the mic.
        let _ = uplink.await;

        result
    }

    /// Hang up the call. Idempotent.
    pub async fn hang_up(&self) {
        tracing::info!("Hang-up requested");
        self.shutdown(CallPhase::Closed).await;
    }

    /// Forward captured frames until the source stops or the call ends.
    ///
    /// Forwarding only begins once the remote endpoint acknowledges the
    /// session (phase leaves `Connecting`).
    async fn pump_uplink(&self) {
        let mut phase_rx = self.inner.phase_tx.subscribe();
        while *phase_rx.borrow() == CallPhase::Connecting {
            if phase_rx.changed().await.is_err() {
                return;
            }
        }
        if self.phase().is_terminal() {
            return;
        }

        while let Some(block) = self.inner.mic.next_block().await {
            if self.inner.released.load(Ordering::SeqCst) {
                break;
            }
            let frame = self.inner.capture.encode_block(&block);
            if self.inner.muted.load(Ordering::SeqCst) {
                // Mute is enforced at send time: the frame was produced and
                // is dropped here, never handed to the uplink.
                continue;
            }
            if let Err(e) = self.inner.link.send_frame(&frame).await {
                if !self.inner.released.load(Ordering::SeqCst) {
                    self.fail(format!("Uplink send failed: {}", e)).await;
                }
                break;
            }
        }
    }

    /// Process downlink events until the session ends.
    async fn pump_downlink(&self) -> Result<()> {
        loop {
            let Some(event) = self.inner.link.next_event().await else {
                self.shutdown(CallPhase::Closed).await;
                return Ok(());
            };

            match event {
                Ok(LinkEvent::Opened) => {
                    tracing::info!(session_id = self.inner.link.session_id(), "Session open");
                    self.set_phase(CallPhase::Listening);
                }
                Ok(LinkEvent::Audio { data, media_type }) => {
                    self.handle_audio(data, &media_type);
                }
                Ok(LinkEvent::TurnComplete) => {
                    tracing::debug!("Turn complete");
                }
                Ok(LinkEvent::Closed) => {
                    tracing::info!("Remote endpoint closed the session");
                    self.shutdown(CallPhase::Closed).await;
                    return Ok(());
                }
                Ok(LinkEvent::Error { reason }) => {
                    self.fail(reason.clone()).await;
                    return Err(VoiceError::connection(reason));
                }
                Err(e) => {
                    self.fail(e.to_string()).await;
                    return Err(e);
                }
            }
        }
    }

    /// Decode one downlink chunk, schedule it, and hand it to the sink.
    ///
    /// A malformed chunk is skipped; the session continues.
    fn handle_audio(&self, data: Vec<u8>, media_type: &str) {
        let format = AudioFormat::from_media_type(media_type)
            .unwrap_or_else(AudioFormat::pcm16_24khz);
        let packet = AudioPacket::new(data, format);

        let mut channels = match packet.to_f32_channels() {
            Ok(channels) => channels,
            Err(e) => {
                tracing::warn!(error = %e, media_type, "Skipping undecodable audio chunk");
                return;
            }
        };
        let samples = channels.swap_remove(0);

        let unit = {
            let now = self.inner.clock.now();
            self.inner.scheduler.lock().schedule(packet.duration_secs(), now)
        };
        tracing::trace!(handle = unit.handle, start = unit.start, duration = unit.duration, "Scheduled chunk");

        self.set_phase(CallPhase::Speaking);
        if let Err(e) = self.inner.out.append(samples, format.sample_rate) {
            tracing::warn!(error = %e, "Dropping chunk: output sink rejected it");
            self.inner.scheduler.lock().retire(unit.handle);
            return;
        }

        // Retire the unit when its scheduled slot elapses; the last
        // retirement flips the status back to listening.
        let session = self.clone();
        tokio::spawn(async move {
            let wait = (unit.end() - session.inner.clock.now()).max(0.0);
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
            let idle = session.inner.scheduler.lock().retire(unit.handle);
            if idle && !session.inner.released.load(Ordering::SeqCst) {
                session.set_phase(CallPhase::Listening);
            }
        });
    }

    /// Record a terminal failure and release everything.
    async fn fail(&self, reason: String) {
        tracing::error!(reason = %reason, "Call failed");
        self.shutdown(CallPhase::Error).await;
    }

    /// Release every acquired resource exactly once.
    ///
    /// Order of concern: stop forwarding captured frames, close the uplink,
    /// release the microphone, close the audio output, clear the active
    /// playback set. Racing invocations (hang-up vs. remote close) are
    /// serialized by the `released` swap; the loser is a no-op.
    async fn shutdown(&self, terminal: CallPhase) {
        if self.inner.released.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = self.inner.link.close().await {
            tracing::debug!(error = %e, "Uplink close after disconnect");
        }
        self.inner.mic.stop();
        self.inner.out.stop();
        self.inner.scheduler.lock().clear();

        self.inner.phase_tx.send_modify(|p| *p = terminal);
        tracing::info!(phase = terminal.label(), "Session released");
    }

    /// Publish a non-terminal phase change. Ignored once the call ended.
    fn set_phase(&self, next: CallPhase) {
        self.inner.phase_tx.send_if_modified(|p| {
            if p.is_terminal() || *p == next {
                false
            } else {
                *p = next;
                true
            }
        });
    }
}

impl std::fmt::Debug for CallSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSession")
            .field("phase", &self.phase())
            .field("muted", &self.is_muted())
            .finish()
    }
}
