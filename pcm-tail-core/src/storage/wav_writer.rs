use std::io::{ErrorKind, Write};

use sha2::{Digest, Sha256};

use crate::models::audio_models::PcmFormat;
use crate::models::config::MAX_PAYLOAD_BYTES;
use crate::models::error::{RetentionError, Segment};
use crate::processing::linearizer::Payload;
use crate::processing::wav_format::{WavHeader, WAV_HEADER_SIZE};

/// Writes a WAV file as a header followed by raw PCM segments.
///
/// Every segment must be transferred in full. A write that makes no
/// progress is a [`RetentionError::ShortWrite`]; the writer never retries
/// beyond `Interrupted`, and nothing after a failed segment is written.
/// Bytes already written stay in the sink.
///
/// A SHA-256 of everything written is kept for the result checksum.
pub struct WavWriter<W: Write> {
    out: W,
    hasher: Sha256,
    total_bytes_written: u64,
}

impl<W: Write> WavWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hasher: Sha256::new(),
            total_bytes_written: 0,
        }
    }

    /// Write the 44-byte header for `data_size` payload bytes.
    pub fn write_header(&mut self, format: PcmFormat, data_size: u32) -> Result<(), RetentionError> {
        let header = WavHeader::new(format, data_size).to_bytes();
        self.write_segment(Segment::Header, &header)
    }

    /// Write one segment in full.
    pub fn write_segment(&mut self, segment: Segment, data: &[u8]) -> Result<(), RetentionError> {
        let mut written = 0;
        while written < data.len() {
            match self.out.write(&data[written..]) {
                Ok(0) => {
                    return Err(RetentionError::ShortWrite {
                        segment,
                        expected: data.len(),
                        written,
                    })
                }
                Ok(n) => {
                    self.hasher.update(&data[written..written + n]);
                    written += n;
                    self.total_bytes_written += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(RetentionError::SinkWriteFailed {
                        segment,
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Flush the sink and return the hex SHA-256 of the written file.
    pub fn finish(mut self) -> Result<String, RetentionError> {
        // Buffered sinks surface deferred payload errors here.
        self.out.flush().map_err(|e| RetentionError::SinkWriteFailed {
            segment: Segment::Newest,
            reason: format!("flush failed: {}", e),
        })?;
        Ok(hex_encode(&self.hasher.finalize()))
    }

    /// Total bytes written so far (including the header).
    pub fn bytes_written(&self) -> u64 {
        self.total_bytes_written
    }
}

/// Write header, oldest segment, then newest segment to `out`.
///
/// Returns the hex SHA-256 of the complete file.
pub fn write_wav<W: Write>(out: W, format: PcmFormat, payload: Payload<'_>) -> Result<String, RetentionError> {
    let data_size = data_chunk_size(payload.len())?;

    let mut writer = WavWriter::new(out);
    writer.write_header(format, data_size)?;
    writer.write_segment(Segment::Oldest, payload.oldest)?;
    writer.write_segment(Segment::Newest, payload.newest)?;

    log::debug!(
        "wrote {} bytes ({} header + {} payload)",
        writer.bytes_written(),
        WAV_HEADER_SIZE,
        payload.len()
    );
    writer.finish()
}

/// Payload length as a `data` chunk size, leaving room for the RIFF size.
fn data_chunk_size(len: usize) -> Result<u32, RetentionError> {
    if len as u64 > MAX_PAYLOAD_BYTES {
        return Err(RetentionError::ConfigurationFailed(format!(
            "payload of {} bytes does not fit a WAV file (max {})",
            len, MAX_PAYLOAD_BYTES
        )));
    }
    Ok(len as u32)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
