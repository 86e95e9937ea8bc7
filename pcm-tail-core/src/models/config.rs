use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::audio_models::{PayloadPolicy, PcmFormat};
use super::error::RetentionError;
use crate::processing::wav_format::WAV_HEADER_SIZE;

/// Largest payload whose RIFF chunk size (`36 + data`) still fits in 32 bits.
pub const MAX_PAYLOAD_BYTES: u64 = u32::MAX as u64 - (WAV_HEADER_SIZE as u64 - 8);

/// Configuration for a retention session.
///
/// Every field is a per-session constant. Missing fields in a JSON config
/// file fall back to [`RetentionConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Length of the retained window in seconds (default: 120).
    pub window_secs: u32,

    /// Sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Interleaved channel count (default: 2).
    pub channels: u16,

    /// Bytes per single-channel sample (default: 2, i.e. 16-bit).
    pub bytes_per_sample: u16,

    /// Read granularity against the source in bytes (default: 4096).
    pub chunk_size: usize,

    /// What to emit when the stream is shorter than the window.
    pub payload_policy: PayloadPolicy,

    /// Memory budget for the ring buffer in bytes (default: unlimited).
    /// A window larger than the budget fails allocation.
    pub max_buffer_bytes: Option<usize>,
}

impl RetentionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_secs == 0 {
            return Err("window must be at least one second".into());
        }
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if !(1..=8).contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if ![1, 2, 3, 4].contains(&self.bytes_per_sample) {
            return Err(format!("unsupported bytes per sample: {}", self.bytes_per_sample));
        }
        if self.chunk_size == 0 {
            return Err("chunk size must be positive".into());
        }

        let capacity = self.capacity_u64();
        if capacity > MAX_PAYLOAD_BYTES {
            return Err(format!(
                "window of {} bytes does not fit a WAV data chunk (max {})",
                capacity, MAX_PAYLOAD_BYTES
            ));
        }
        if self.chunk_size as u64 > capacity {
            return Err(format!(
                "chunk size {} exceeds buffer capacity {}",
                self.chunk_size, capacity
            ));
        }
        Ok(())
    }

    /// Ring buffer capacity: window × rate × channels × bytes per sample.
    ///
    /// Call [`validate`](Self::validate) first; this saturates rather than
    /// overflowing on nonsensical input.
    pub fn capacity_bytes(&self) -> usize {
        usize::try_from(self.capacity_u64()).unwrap_or(usize::MAX)
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels, self.bytes_per_sample * 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.format().byte_rate()
    }

    pub fn block_align(&self) -> u16 {
        self.format().block_align()
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bytes_per_sample * 8
    }

    /// Load a configuration from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, RetentionError> {
        let json = fs::read_to_string(path).map_err(|e| {
            RetentionError::ConfigurationFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            RetentionError::ConfigurationFailed(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save this configuration as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), RetentionError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RetentionError::ConfigurationFailed(format!("failed to serialize config: {}", e)))?;
        fs::write(path, json).map_err(|e| {
            RetentionError::ConfigurationFailed(format!("failed to write {}: {}", path.display(), e))
        })
    }

    fn capacity_u64(&self) -> u64 {
        (self.window_secs as u64)
            .saturating_mul(self.sample_rate as u64)
            .saturating_mul(self.channels as u64)
            .saturating_mul(self.bytes_per_sample as u64)
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window_secs: 120,
            sample_rate: 44100,
            channels: 2,
            bytes_per_sample: 2,
            chunk_size: 4096,
            payload_policy: PayloadPolicy::FullWindow,
            max_buffer_bytes: None,
        }
    }
}
