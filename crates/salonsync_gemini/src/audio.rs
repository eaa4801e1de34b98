//! PCM audio conversion for the Live session.
//!
//! Microphone audio goes up as 16 kHz mono 16-bit little-endian PCM, base64
//! encoded. Model speech comes back the same way at 24 kHz and is handed to
//! the browser as float samples with a playback start time.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::error::VoiceError;

pub const INPUT_SAMPLE_RATE: u32 = 16_000;
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;
pub const INPUT_MIME_TYPE: &str = "audio/pcm;rate=16000";

/// Float samples in [-1, 1] to 16-bit little-endian PCM. Out-of-range input is clamped.
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let scaled = if sample.is_nan() {
            0.0
        } else {
            (sample * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32)
        };
        bytes.extend_from_slice(&(scaled as i16).to_le_bytes());
    }
    bytes
}

/// 16-bit little-endian PCM to float samples. A trailing odd byte is ignored.
pub fn pcm16_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// Browser frames carry raw 32-bit float little-endian samples.
pub fn f32_from_le_bytes(bytes: &[u8]) -> Result<Vec<f32>, VoiceError> {
    if bytes.len() % 4 != 0 {
        return Err(VoiceError::Audio(format!(
            "frame of {} bytes is not a whole number of f32 samples",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|quad| f32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
        .collect())
}

/// Microphone samples as the base64 payload of a realtime input chunk.
pub fn encode_input(samples: &[f32]) -> String {
    STANDARD.encode(f32_to_pcm16(samples))
}

/// Base64 model audio to float samples at [`OUTPUT_SAMPLE_RATE`].
pub fn decode_output(data: &str) -> Result<Vec<f32>, VoiceError> {
    let bytes = STANDARD
        .decode(data)
        .map_err(|err| VoiceError::Audio(err.to_string()))?;
    Ok(pcm16_to_f32(&bytes))
}

/// Where a decoded chunk sits on the playback timeline, in seconds.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ScheduledChunk {
    pub start: f64,
    pub duration: f64,
}

/// Queues model audio back to back so chunks never overlap.
#[derive(Debug, Default, Clone)]
pub struct PlaybackScheduler {
    next_start: f64,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a chunk of `samples` at `max(next_start, now)` and moves
    /// `next_start` to its end.
    pub fn schedule(&mut self, now: f64, samples: usize) -> ScheduledChunk {
        let duration = samples as f64 / OUTPUT_SAMPLE_RATE as f64;
        let start = self.next_start.max(now);
        self.next_start = start + duration;
        ScheduledChunk { start, duration }
    }

    /// Drops the queue, e.g. after the model was interrupted.
    pub fn reset(&mut self) {
        self.next_start = 0.0;
    }

    pub fn next_start(&self) -> f64 {
        self.next_start
    }
}
