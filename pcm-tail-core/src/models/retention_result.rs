use std::path::Path;

use serde::{Deserialize, Serialize};

use super::audio_models::{PayloadPolicy, PcmFormat};
use super::error::RetentionError;

/// Result returned when a session has written its output.
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionResult {
    /// Human-readable description of the sink (a path for file sinks).
    pub output: String,
    pub format: PcmFormat,
    pub policy: PayloadPolicy,
    /// Total bytes drained from the source.
    pub bytes_ingested: u64,
    /// Payload bytes written after the header.
    pub bytes_retained: usize,
    /// Whether the stream overran the buffer at least once.
    pub wrapped: bool,
    /// Final write cursor (index of the oldest retained byte once wrapped).
    pub cursor: usize,
    pub duration_secs: f64,
    /// SHA-256 of the complete output, lowercase hex.
    pub checksum: String,
    /// Mid-stream read failure that cut ingestion short, if any.
    pub source_error: Option<RetentionError>,
    /// Whether ingestion stopped early on cancellation.
    pub cancelled: bool,
}

impl RetentionResult {
    /// Whether the full window was captured without a read failure or cancel.
    pub fn is_complete(&self) -> bool {
        self.source_error.is_none() && !self.cancelled
    }
}

/// JSON sidecar describing an output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionMetadata {
    pub id: String,
    pub created_at: String,
    pub file_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub payload_policy: PayloadPolicy,
    pub bytes_ingested: u64,
    pub bytes_retained: usize,
    pub wrapped: bool,
    pub duration_secs: f64,
    pub checksum: String,
    pub partial: bool,
}

impl RetentionMetadata {
    pub fn from_result(result: &RetentionResult, file_path: &Path) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            file_path: file_path.display().to_string(),
            sample_rate: result.format.sample_rate,
            channels: result.format.channels,
            bits_per_sample: result.format.bits_per_sample,
            payload_policy: result.policy,
            bytes_ingested: result.bytes_ingested,
            bytes_retained: result.bytes_retained,
            wrapped: result.wrapped,
            duration_secs: result.duration_secs,
            checksum: result.checksum.clone(),
            partial: !result.is_complete(),
        }
    }
}
