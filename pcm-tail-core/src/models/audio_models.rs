use serde::{Deserialize, Serialize};

/// Sample geometry of a PCM stream.
///
/// Fixed for the lifetime of a session; the WAV header is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// Bytes per single-channel sample.
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per frame (one sample for every channel).
    ///
    /// Saturates at `u16::MAX` for geometries no WAV header can describe.
    pub fn block_align(&self) -> u16 {
        u16::try_from(self.block_align_wide()).unwrap_or(u16::MAX)
    }

    /// Bytes of audio per second.
    ///
    /// Saturates at `u32::MAX`; a validated config always fits.
    pub fn byte_rate(&self) -> u32 {
        u32::try_from(self.byte_rate_wide()).unwrap_or(u32::MAX)
    }

    /// Playback duration of `bytes` of payload in this format.
    pub fn duration_secs(&self, bytes: u64) -> f64 {
        let rate = self.byte_rate_wide();
        if rate == 0 {
            return 0.0;
        }
        bytes as f64 / rate as f64
    }

    fn block_align_wide(&self) -> u64 {
        self.channels as u64 * self.bytes_per_sample() as u64
    }

    fn byte_rate_wide(&self) -> u64 {
        self.sample_rate as u64 * self.block_align_wide()
    }
}

/// How much of the ring buffer is emitted when the stream was shorter than
/// the retention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    /// Always emit the full capacity. Bytes never written are zero (silence)
    /// and lead the output.
    #[default]
    FullWindow,
    /// Emit only bytes that were actually captured: `min(ingested, capacity)`.
    CapturedOnly,
}

/// Counters collected while draining the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestDiagnostics {
    pub chunks_read: u64,
    pub bytes_ingested: u64,
    pub interrupted_reads: u64,
    pub wraps: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cd_quality_derived_fields() {
        let format = PcmFormat::new(44100, 2, 16);
        assert_eq!(format.bytes_per_sample(), 2);
        assert_eq!(format.block_align(), 4);
        assert_eq!(format.byte_rate(), 176_400);
    }

    #[test]
    fn duration_of_payload() {
        let format = PcmFormat::new(8000, 1, 8);
        assert_relative_eq!(format.duration_secs(4000), 0.5);
        assert_relative_eq!(format.duration_secs(0), 0.0);
    }

    #[test]
    fn oversized_geometry_does_not_overflow() {
        let format = PcmFormat::new(u32::MAX, 60_000, 32);
        assert_eq!(format.block_align(), u16::MAX);
        assert_eq!(format.byte_rate(), u32::MAX);

        let rate = u32::MAX as f64 * 240_000.0;
        assert_relative_eq!(format.duration_secs(1 << 40), (1u64 << 40) as f64 / rate);
    }

    #[test]
    fn payload_policy_serializes_snake_case() {
        let json = serde_json::to_string(&PayloadPolicy::CapturedOnly).unwrap();
        assert_eq!(json, "\"captured_only\"");
        assert_eq!(PayloadPolicy::default(), PayloadPolicy::FullWindow);
    }
}
