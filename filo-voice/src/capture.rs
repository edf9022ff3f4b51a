//! Microphone capture and uplink frame encoding.
//!
//! The capture stage itself is a pure conversion: each block of float
//! samples from the input device becomes one fixed-format PCM frame. Device
//! access sits behind the object-safe [`AudioSource`] trait; the cpal-backed
//! [`MicSource`] runs its stream on a dedicated thread because cpal streams
//! are not `Send`, handing blocks to the async side over a channel.

use crate::audio::{AudioFormat, AudioPacket};
use crate::error::{Result, VoiceError};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use std::thread;
use tokio::sync::mpsc;

/// Converts raw float blocks into uplink frames.
///
/// Stateless across blocks: one block in, one frame out, no buffering.
#[derive(Debug, Clone)]
pub struct CaptureStage {
    format: AudioFormat,
}

impl CaptureStage {
    /// Create a capture stage producing frames in `format`.
    pub fn new(format: AudioFormat) -> Self {
        Self { format }
    }

    /// The frame format this stage produces.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Encode one block of float samples into a wire-ready frame.
    pub fn encode_block(&self, samples: &[f32]) -> AudioPacket {
        AudioPacket::from_f32_samples(samples, self.format)
    }
}

/// Abstraction over a microphone input stream.
///
/// All methods take `&self` so the trait is object-safe; implementations use
/// interior mutability (channels, atomic flags) for state changes.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Receive the next block of float samples in [-1.0, 1.0].
    ///
    /// Returns `None` once the source has stopped.
    async fn next_block(&self) -> Option<Vec<f32>>;

    /// Release the input device. Subsequent `next_block` calls drain any
    /// buffered blocks and then return `None`. Safe to call more than once.
    fn stop(&self);
}

/// A boxed source type for dynamic dispatch.
pub type BoxedAudioSource = Box<dyn AudioSource>;

/// cpal-backed microphone source.
pub struct MicSource {
    blocks: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<f32>>>,
    stop_tx: parking_lot::Mutex<Option<std::sync::mpsc::Sender<()>>>,
}

impl MicSource {
    /// Acquire the default input device at the requested format.
    pub fn open(format: &AudioFormat) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| VoiceError::capture("No default input device"))?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        tracing::info!(device = %device_name, rate = format.sample_rate, "Using input device");

        let stream_config = StreamConfig {
            channels: format.channels as u16,
            sample_rate: SampleRate(format.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (block_tx, block_rx) = mpsc::unbounded_channel::<Vec<f32>>();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();

        thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || run_capture_thread(device, stream_config, block_tx, stop_rx))
            .map_err(|e| VoiceError::capture(format!("Failed to spawn capture thread: {}", e)))?;

        Ok(Self {
            blocks: tokio::sync::Mutex::new(block_rx),
            stop_tx: parking_lot::Mutex::new(Some(stop_tx)),
        })
    }
}

#[async_trait]
impl AudioSource for MicSource {
    async fn next_block(&self) -> Option<Vec<f32>> {
        self.blocks.lock().await.recv().await
    }

    fn stop(&self) {
        if let Some(tx) = self.stop_tx.lock().take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MicSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run the cpal stream on its own thread until the stop signal arrives.
///
/// Dropping `block_tx` when the thread exits is what makes `next_block`
/// return `None` on the async side.
fn run_capture_thread(
    device: cpal::Device,
    config: StreamConfig,
    block_tx: mpsc::UnboundedSender<Vec<f32>>,
    stop_rx: std::sync::mpsc::Receiver<()>,
) {
    let err_fn = |err| tracing::error!(error = %err, "Input stream error");

    let stream = match device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let _ = block_tx.send(data.to_vec());
        },
        err_fn,
        None,
    ) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build input stream");
            return;
        }
    };

    if let Err(e) = stream.play() {
        tracing::error!(error = %e, "Failed to start input stream");
        return;
    }

    tracing::debug!("Capture thread started");

    // Block until stop is signalled or the handle is dropped.
    let _ = stop_rx.recv();

    tracing::debug!("Capture thread stopping");
    drop(stream);
}
