//! Audio format definitions and PCM packet utilities.

use crate::error::{Result, VoiceError};
use serde::{Deserialize, Serialize};

/// Complete audio format specification.
///
/// Everything on the wire is linear 16-bit signed little-endian PCM; the
/// uplink and downlink differ only in sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (16000 uplink, 24000 downlink).
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono).
    pub channels: u8,
    /// Bits per sample.
    pub bits_per_sample: u8,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::pcm16_24khz()
    }
}

impl AudioFormat {
    /// Create a new audio format specification.
    pub fn new(sample_rate: u32, channels: u8, bits_per_sample: u8) -> Self {
        Self { sample_rate, channels, bits_per_sample }
    }

    /// PCM16 format at 16kHz (microphone uplink).
    pub fn pcm16_16khz() -> Self {
        Self { sample_rate: 16000, channels: 1, bits_per_sample: 16 }
    }

    /// PCM16 format at 24kHz (synthesized-speech downlink).
    pub fn pcm16_24khz() -> Self {
        Self { sample_rate: 24000, channels: 1, bits_per_sample: 16 }
    }

    /// Media-type string declared on wire frames, e.g. `audio/pcm;rate=16000`.
    pub fn media_type(&self) -> String {
        format!("audio/pcm;rate={}", self.sample_rate)
    }

    /// Parse a declared media-type string back into a format.
    ///
    /// Only `audio/pcm` is recognized. A missing `rate` parameter falls back
    /// to the downlink default of 24kHz.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let mut parts = media_type.split(';');
        if parts.next().map(str::trim) != Some("audio/pcm") {
            return None;
        }
        let rate = parts
            .filter_map(|p| p.trim().strip_prefix("rate="))
            .find_map(|r| r.parse::<u32>().ok())
            .unwrap_or(24000);
        Some(Self { sample_rate: rate, channels: 1, bits_per_sample: 16 })
    }

    /// Bytes per interleaved sample frame (all channels).
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * (self.bits_per_sample / 8) as usize
    }

    /// Calculate bytes per second for this format.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.channels as u32 * (self.bits_per_sample / 8) as u32
    }

    /// Calculate duration in seconds for a given number of bytes.
    pub fn duration_secs(&self, bytes: usize) -> f64 {
        bytes as f64 / self.bytes_per_second() as f64
    }
}

/// One chunk of PCM audio with its format.
///
/// Invariant: `data.len()` is always an even multiple of
/// [`AudioFormat::frame_bytes`] when produced by this crate's encoders.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPacket {
    /// Raw interleaved little-endian sample bytes.
    pub data: Vec<u8>,
    /// Audio format of this packet.
    pub format: AudioFormat,
}

impl AudioPacket {
    /// Create a new audio packet.
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Duration of this packet in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.format.duration_secs(self.data.len())
    }

    /// Encode the packet payload as base64 for the wire.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Decode a base64 wire payload into a packet.
    pub fn from_base64(encoded: &str, format: AudioFormat) -> Result<Self> {
        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| VoiceError::audio(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(data, format))
    }

    /// Build a packet from float samples in [-1.0, 1.0].
    ///
    /// Each sample is converted via `round(s * 32768)` and clamped to the
    /// i16 range before narrowing, so out-of-range input saturates instead
    /// of wrapping.
    pub fn from_f32_samples(samples: &[f32], format: AudioFormat) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for &s in samples {
            let v = (f64::from(s) * 32768.0).round().clamp(-32768.0, 32767.0) as i16;
            data.extend_from_slice(&v.to_le_bytes());
        }
        Self::new(data, format)
    }

    /// Build a packet from i16 samples (little-endian on the wire).
    pub fn from_i16_samples(samples: &[i16], format: AudioFormat) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        Self::new(data, format)
    }

    /// Interpret the payload as i16 little-endian samples.
    pub fn to_i16_samples(&self) -> Result<Vec<i16>> {
        if self.data.len() % 2 != 0 {
            return Err(VoiceError::audio(format!(
                "Invalid data length for PCM16: {} (must be even)",
                self.data.len()
            )));
        }
        let mut samples = Vec::with_capacity(self.data.len() / 2);
        for chunk in self.data.chunks_exact(2) {
            samples.push(i16::from_le_bytes([chunk[0], chunk[1]]));
        }
        Ok(samples)
    }

    /// Decode into normalized float samples per channel.
    ///
    /// Deinterleaves by channel count; each sample becomes `s / 32768.0`.
    pub fn to_f32_channels(&self) -> Result<Vec<Vec<f32>>> {
        let channels = self.format.channels as usize;
        if channels == 0 {
            return Err(VoiceError::audio("Zero channel count"));
        }
        let interleaved = self.to_i16_samples()?;
        if interleaved.len() % channels != 0 {
            return Err(VoiceError::audio(format!(
                "Sample count {} not divisible by channel count {}",
                interleaved.len(),
                channels
            )));
        }
        let frames = interleaved.len() / channels;
        let mut out = vec![Vec::with_capacity(frames); channels];
        for (i, &s) in interleaved.iter().enumerate() {
            out[i % channels].push(f32::from(s) / 32768.0);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_bytes_per_second() {
        assert_eq!(AudioFormat::pcm16_24khz().bytes_per_second(), 48000); // 24000 * 1 * 2
        assert_eq!(AudioFormat::pcm16_16khz().bytes_per_second(), 32000); // 16000 * 1 * 2
    }

    #[test]
    fn test_audio_format_duration() {
        let format = AudioFormat::pcm16_24khz();
        // 48000 bytes = 1 second
        assert!((format.duration_secs(48000) - 1.0).abs() < 1e-9);
        assert!((format.duration_secs(24000) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_media_type_roundtrip() {
        let format = AudioFormat::pcm16_16khz();
        assert_eq!(format.media_type(), "audio/pcm;rate=16000");
        assert_eq!(AudioFormat::from_media_type("audio/pcm;rate=16000"), Some(format));
    }

    #[test]
    fn test_media_type_defaults_to_downlink_rate() {
        assert_eq!(
            AudioFormat::from_media_type("audio/pcm"),
            Some(AudioFormat::pcm16_24khz())
        );
        assert_eq!(AudioFormat::from_media_type("audio/ogg"), None);
    }

    #[test]
    fn test_packet_base64_roundtrip() {
        let original = AudioPacket::new(vec![0, 1, 2, 3, 4, 5], AudioFormat::pcm16_24khz());
        let encoded = original.to_base64();
        let decoded = AudioPacket::from_base64(&encoded, AudioFormat::pcm16_24khz()).unwrap();
        assert_eq!(original.data, decoded.data);
    }

    #[test]
    fn test_i16_samples_roundtrip() {
        let samples: Vec<i16> = vec![0, 1, -1, 32767, -32768, 1000, -1000];
        let packet = AudioPacket::from_i16_samples(&samples, AudioFormat::pcm16_24khz());
        assert_eq!(packet.to_i16_samples().unwrap(), samples);
    }

    #[test]
    fn test_i16_samples_odd_bytes_error() {
        let packet = AudioPacket::new(vec![0, 1, 2], AudioFormat::pcm16_24khz()); // 3 bytes = invalid PCM16
        assert!(packet.to_i16_samples().is_err());
    }

    #[test]
    fn test_f32_encode_known_values() {
        let packet =
            AudioPacket::from_f32_samples(&[0.0, 0.5, -0.5], AudioFormat::pcm16_16khz());
        assert_eq!(packet.to_i16_samples().unwrap(), vec![0, 16384, -16384]);
    }

    #[test]
    fn test_f32_encode_saturates_out_of_range() {
        // 1.0 * 32768 exceeds i16::MAX; out-of-range gain must saturate, not wrap.
        let packet =
            AudioPacket::from_f32_samples(&[1.0, -1.0, 2.0, -2.0], AudioFormat::pcm16_16khz());
        assert_eq!(packet.to_i16_samples().unwrap(), vec![32767, -32768, 32767, -32768]);
    }

    #[test]
    fn test_f32_decode_normalizes() {
        let packet =
            AudioPacket::from_i16_samples(&[0, 16384, -32768], AudioFormat::pcm16_24khz());
        let channels = packet.to_f32_channels().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0], vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn test_f32_decode_deinterleaves_stereo() {
        let stereo = AudioFormat::new(24000, 2, 16);
        let packet = AudioPacket::from_i16_samples(&[1, 2, 3, 4, 5, 6], stereo);
        let channels = packet.to_f32_channels().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].len(), 3);
        assert_eq!(channels[1].len(), 3);
        assert!((channels[1][0] - 2.0 / 32768.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_packet() {
        let packet = AudioPacket::from_f32_samples(&[], AudioFormat::pcm16_16khz());
        assert!(packet.data.is_empty());
        assert_eq!(packet.duration_secs(), 0.0);
        assert_eq!(packet.to_f32_channels().unwrap(), vec![Vec::<f32>::new()]);
    }
}
