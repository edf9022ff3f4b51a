//! Playback scheduling for the synthesized-speech downlink.
//!
//! Packets arrive at irregular network intervals but must render as
//! continuous speech. [`PlaybackScheduler`] derives each packet's start time
//! from the cumulative end of everything scheduled before it, never from
//! arrival time, so bursts queue seamlessly and late arrivals start
//! immediately. The scheduler is pure state; rendering goes through the
//! object-safe [`AudioOut`] trait.

use crate::error::{Result, VoiceError};
use rodio::buffer::SamplesBuffer;
use std::collections::HashSet;
use std::thread;
use std::time::Instant;

/// Monotonic audio-clock reading, in seconds.
pub trait AudioClock: Send + Sync {
    /// Current clock time.
    fn now(&self) -> f64;
}

/// Wall-clock backed [`AudioClock`] anchored at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock reading zero now.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioClock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A decoded packet bound to its scheduled start time and active handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackUnit {
    /// Handle identifying this unit in the active set.
    pub handle: u64,
    /// Scheduled start on the audio clock.
    pub start: f64,
    /// Packet duration in seconds.
    pub duration: f64,
}

impl PlaybackUnit {
    /// Clock time at which this unit finishes.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Gap-free, non-overlapping playback sequencing.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    next_start: f64,
    next_handle: u64,
    active: HashSet<u64>,
}

impl PlaybackScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a start time to a packet of `duration` seconds arriving at
    /// clock time `now`.
    ///
    /// `start = max(next_start, now)`: never in the past, never before the
    /// previous packet finishes. Advances `next_start` past this packet and
    /// registers the unit in the active set.
    pub fn schedule(&mut self, duration: f64, now: f64) -> PlaybackUnit {
        let start = self.next_start.max(now);
        self.next_start = start + duration;

        let handle = self.next_handle;
        self.next_handle += 1;
        self.active.insert(handle);

        PlaybackUnit { handle, start, duration }
    }

    /// Remove a unit that finished playing.
    ///
    /// Returns `true` when this removal drained the active set: the
    /// "playback idle" signal that flips the call status from speaking back
    /// to listening.
    pub fn retire(&mut self, handle: u64) -> bool {
        self.active.remove(&handle) && self.active.is_empty()
    }

    /// Drop every active unit (session teardown).
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Whether nothing is currently scheduled or playing.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// The earliest time the next packet may begin.
    pub fn next_start(&self) -> f64 {
        self.next_start
    }
}

/// Abstraction over an audio output sink.
///
/// All methods take `&self`; implementations use interior mutability so the
/// trait stays object-safe.
pub trait AudioOut: Send + Sync {
    /// Append mono float samples for back-to-back rendering.
    fn append(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()>;

    /// Stop playback and release the output device. Safe to call more than
    /// once.
    fn stop(&self);
}

/// A boxed sink type for dynamic dispatch.
pub type BoxedAudioOut = Box<dyn AudioOut>;

enum SinkCommand {
    Append { samples: Vec<f32>, sample_rate: u32 },
    Stop,
}

/// rodio-backed speaker sink.
///
/// The output stream lives on a dedicated thread (rodio streams are not
/// `Send`); the sink's internal queue renders appended buffers back-to-back,
/// realizing the scheduler's gap-free contract.
pub struct SpeakerOut {
    commands: parking_lot::Mutex<Option<std::sync::mpsc::Sender<SinkCommand>>>,
}

impl SpeakerOut {
    /// Acquire the default output device.
    pub fn open() -> Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel::<SinkCommand>();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<std::result::Result<(), String>>();

        thread::Builder::new()
            .name("speaker-out".to_string())
            .spawn(move || run_output_thread(rx, ready_tx))
            .map_err(|e| VoiceError::playback(format!("Failed to spawn output thread: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| VoiceError::playback("Output thread died during startup"))?
            .map_err(VoiceError::Playback)?;

        Ok(Self { commands: parking_lot::Mutex::new(Some(tx)) })
    }
}

impl AudioOut for SpeakerOut {
    fn append(&self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        let guard = self.commands.lock();
        let tx = guard.as_ref().ok_or(VoiceError::SessionClosed)?;
        tx.send(SinkCommand::Append { samples, sample_rate })
            .map_err(|_| VoiceError::playback("Output thread gone"))
    }

    fn stop(&self) {
        if let Some(tx) = self.commands.lock().take() {
            let _ = tx.send(SinkCommand::Stop);
        }
    }
}

impl Drop for SpeakerOut {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_output_thread(
    rx: std::sync::mpsc::Receiver<SinkCommand>,
    ready_tx: std::sync::mpsc::Sender<std::result::Result<(), String>>,
) {
    let (stream, handle) = match rodio::OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("No output device: {}", e)));
            return;
        }
    };
    let sink = match rodio::Sink::try_new(&handle) {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("Failed to create sink: {}", e)));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));

    while let Ok(command) = rx.recv() {
        match command {
            SinkCommand::Append { samples, sample_rate } => {
                sink.append(SamplesBuffer::new(1, sample_rate, samples));
            }
            SinkCommand::Stop => break,
        }
    }

    sink.stop();
    drop(stream);
    tracing::debug!("Output thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_packet_starts_at_arrival() {
        let mut scheduler = PlaybackScheduler::new();
        let unit = scheduler.schedule(0.5, 0.0);
        assert_eq!(unit.start, 0.0);
        assert_eq!(scheduler.next_start(), 0.5);
    }

    #[test]
    fn test_early_packet_queues_after_previous() {
        // Second frame arrives at t=0.2 while the first still plays until 0.5:
        // it must start at 0.5, not 0.2.
        let mut scheduler = PlaybackScheduler::new();
        scheduler.schedule(0.5, 0.0);
        let unit = scheduler.schedule(0.5, 0.2);
        assert_eq!(unit.start, 0.5);
        assert_eq!(scheduler.next_start(), 1.0);
    }

    #[test]
    fn test_late_packet_starts_at_arrival() {
        // next_start is 1.0 but the frame only arrives at 1.5: no point
        // scheduling in the past.
        let mut scheduler = PlaybackScheduler::new();
        scheduler.schedule(1.0, 0.0);
        let unit = scheduler.schedule(0.25, 1.5);
        assert_eq!(unit.start, 1.5);
        assert_eq!(scheduler.next_start(), 1.75);
    }

    #[test]
    fn test_no_overlap_no_unnecessary_gap() {
        let durations = [0.3, 0.1, 0.6, 0.2, 0.4];
        let arrivals = [0.0, 0.05, 0.9, 0.95, 2.0];
        let mut scheduler = PlaybackScheduler::new();
        let mut prev_end = 0.0;
        for (&d, &t) in durations.iter().zip(&arrivals) {
            let unit = scheduler.schedule(d, t);
            assert!(unit.start >= prev_end, "overlap at arrival {}", t);
            assert_eq!(unit.start, prev_end.max(t), "unnecessary gap at arrival {}", t);
            prev_end = unit.end();
        }
    }

    #[test]
    fn test_start_times_monotonic() {
        let mut scheduler = PlaybackScheduler::new();
        let mut last = f64::MIN;
        for (d, t) in [(0.5, 0.0), (0.5, 0.1), (0.1, 3.0), (0.2, 2.5), (0.2, 3.05)] {
            let unit = scheduler.schedule(d, t);
            assert!(unit.start >= last);
            last = unit.start;
        }
    }

    #[test]
    fn test_retire_signals_idle_only_when_drained() {
        let mut scheduler = PlaybackScheduler::new();
        let a = scheduler.schedule(0.5, 0.0);
        let b = scheduler.schedule(0.5, 0.0);
        assert!(!scheduler.retire(a.handle));
        assert!(scheduler.retire(b.handle));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_retire_unknown_handle_is_not_idle_signal() {
        let mut scheduler = PlaybackScheduler::new();
        scheduler.schedule(0.5, 0.0);
        assert!(!scheduler.retire(999));
        assert!(!scheduler.is_idle());
    }

    #[test]
    fn test_clear_empties_active_set() {
        let mut scheduler = PlaybackScheduler::new();
        scheduler.schedule(0.5, 0.0);
        scheduler.schedule(0.5, 0.0);
        scheduler.clear();
        assert!(scheduler.is_idle());
    }
}
