//! WAV container header generation and parsing.
//!
//! Only the canonical 44-byte PCM layout is produced or accepted: a RIFF
//! descriptor, a 16-byte `fmt ` chunk, and a `data` chunk header, with no
//! padding and all integers little-endian.

use crate::models::audio_models::PcmFormat;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// PCM format tag in the `fmt ` chunk.
pub const PCM_FORMAT_TAG: u16 = 1;

/// Size of the `fmt ` chunk body for plain PCM.
const FMT_CHUNK_SIZE: u32 = 16;

/// Decoded view of a 44-byte WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `data_size` bytes of payload in `format`.
    ///
    /// `data_size` must not exceed `u32::MAX - 36`; larger sizes saturate
    /// the RIFF chunk size.
    pub fn new(format: PcmFormat, data_size: u32) -> Self {
        Self {
            chunk_size: data_size.saturating_add(36),
            audio_format: PCM_FORMAT_TAG,
            channels: format.channels,
            sample_rate: format.sample_rate,
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bits_per_sample: format.bits_per_sample,
            data_size,
        }
    }

    /// Serialize to the on-disk layout.
    ///
    /// ```text
    /// [0-3]    "RIFF"
    /// [4-7]    chunk size = 36 + data_size
    /// [8-11]   "WAVE"
    /// [12-15]  "fmt "
    /// [16-19]  16 (PCM format chunk size)
    /// [20-21]  1 (PCM format code)
    /// [22-23]  channels
    /// [24-27]  sample_rate
    /// [28-31]  byte_rate = sample_rate * channels * bytes_per_sample
    /// [32-33]  block_align = channels * bytes_per_sample
    /// [34-35]  bits_per_sample
    /// [36-39]  "data"
    /// [40-43]  data_size
    /// ```
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let mut header = [0u8; WAV_HEADER_SIZE];

        // RIFF chunk descriptor
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");

        // fmt sub-chunk
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        header[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        // data sub-chunk
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        header
    }

    /// Parse a canonical 44-byte PCM header.
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(format!(
                "header too short: {} bytes, need {}",
                bytes.len(),
                WAV_HEADER_SIZE
            ));
        }

        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            if &bytes[offset..offset + 4] != tag {
                return Err(format!(
                    "expected {:?} at offset {}",
                    String::from_utf8_lossy(tag),
                    offset
                ));
            }
        }

        let fmt_size = read_u32(bytes, 16);
        if fmt_size != FMT_CHUNK_SIZE {
            return Err(format!("unsupported fmt chunk size: {}", fmt_size));
        }

        Ok(Self {
            chunk_size: read_u32(bytes, 4),
            audio_format: read_u16(bytes, 20),
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_size: read_u32(bytes, 40),
        })
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels, self.bits_per_sample)
    }

    /// Playback duration of the data chunk, using the stored byte rate.
    pub fn duration_secs(&self) -> f64 {
        if self.byte_rate == 0 {
            return 0.0;
        }
        self.data_size as f64 / self.byte_rate as f64
    }
}

/// Generate a 44-byte WAV RIFF header for `data_size` bytes of PCM.
pub fn generate_wav_header(format: PcmFormat, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    WavHeader::new(format, data_size).to_bytes()
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cd_stereo() -> PcmFormat {
        PcmFormat::new(44100, 2, 16)
    }

    #[test]
    fn header_size_is_44_bytes() {
        let header = generate_wav_header(cd_stereo(), 0);
        assert_eq!(header.len(), 44);
    }

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(cd_stereo(), 0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_pcm_format() {
        let header = generate_wav_header(cd_stereo(), 0);
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
        assert_eq!(u32::from_le_bytes([header[16], header[17], header[18], header[19]]), 16);
    }

    #[test]
    fn header_one_second_44k_stereo_16bit() {
        let header = generate_wav_header(cd_stereo(), 176_400);

        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, 176_436);

        let channels = u16::from_le_bytes([header[22], header[23]]);
        assert_eq!(channels, 2);

        let sample_rate = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);
        assert_eq!(sample_rate, 44100);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 176_400);

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 4);

        let bits = u16::from_le_bytes([header[34], header[35]]);
        assert_eq!(bits, 16);

        let data_size = u32::from_le_bytes([header[40], header[41], header[42], header[43]]);
        assert_eq!(data_size, 176_400);
    }

    #[test]
    fn parse_reads_back_generated_header() {
        let format = PcmFormat::new(8000, 1, 8);
        let bytes = generate_wav_header(format, 1234);

        let parsed = WavHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, WavHeader::new(format, 1234));
        assert_eq!(parsed.format(), format);
    }

    #[test]
    fn corrupt_channel_count_does_not_panic() {
        let mut bytes = generate_wav_header(cd_stereo(), 176_400);
        bytes[22..24].copy_from_slice(&60_000u16.to_le_bytes());

        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.channels, 60_000);
        assert_eq!(header.duration_secs(), 1.0);
        assert_eq!(header.format().block_align(), u16::MAX);
    }

    #[test]
    fn zero_byte_rate_has_zero_duration() {
        let mut bytes = generate_wav_header(cd_stereo(), 100);
        bytes[28..32].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(WavHeader::parse(&bytes).unwrap().duration_secs(), 0.0);
    }

    #[test]
    fn chunk_size_saturates_at_u32_max() {
        let header = WavHeader::new(cd_stereo(), u32::MAX);
        assert_eq!(header.chunk_size, u32::MAX);
    }

    #[test]
    fn parse_rejects_truncated_and_foreign_headers() {
        assert!(WavHeader::parse(&[0u8; 10]).is_err());

        let mut bytes = generate_wav_header(cd_stereo(), 0);
        bytes[8..12].copy_from_slice(b"AVI ");
        let err = WavHeader::parse(&bytes).unwrap_err();
        assert!(err.contains("offset 8"));
    }
}
