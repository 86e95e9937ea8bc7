use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::RetentionError;
use crate::models::retention_result::RetentionMetadata;

/// Path of the JSON sidecar for `recording_path`: `{stem}.metadata.json`.
pub fn metadata_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

/// Write retention metadata as a JSON sidecar file next to the recording.
pub fn write_metadata(metadata: &RetentionMetadata, recording_path: &Path) -> Result<PathBuf, RetentionError> {
    let path = metadata_path(recording_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| RetentionError::MetadataFailed(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| RetentionError::MetadataFailed(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read retention metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<RetentionMetadata, RetentionError> {
    let json = fs::read_to_string(metadata_path(recording_path))
        .map_err(|e| RetentionError::MetadataFailed(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| RetentionError::MetadataFailed(format!("failed to parse metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_models::{PayloadPolicy, PcmFormat};
    use crate::models::retention_result::RetentionResult;

    fn result() -> RetentionResult {
        RetentionResult {
            output: "out.wav".into(),
            format: PcmFormat::new(44100, 2, 16),
            policy: PayloadPolicy::FullWindow,
            bytes_ingested: 500_000,
            bytes_retained: 176_400,
            wrapped: true,
            cursor: 147_200,
            duration_secs: 1.0,
            checksum: "ab".repeat(32),
            source_error: None,
            cancelled: false,
        }
    }

    #[test]
    fn sidecar_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let recording = dir.path().join("tail.wav");
        let metadata = RetentionMetadata::from_result(&result(), &recording);

        let written = write_metadata(&metadata, &recording).unwrap();
        assert_eq!(written, dir.path().join("tail.metadata.json"));

        let loaded = read_metadata(&recording).unwrap();
        assert_eq!(loaded, metadata);
        assert!(!loaded.partial);
        assert_eq!(loaded.bits_per_sample, 16);
    }

    #[test]
    fn partial_capture_is_flagged() {
        let mut cancelled = result();
        cancelled.cancelled = true;
        let metadata = RetentionMetadata::from_result(&cancelled, Path::new("x.wav"));
        assert!(metadata.partial);
    }

    #[test]
    fn missing_sidecar_is_an_error() {
        let err = read_metadata(Path::new("/nonexistent/tail.wav")).unwrap_err();
        assert!(matches!(err, RetentionError::MetadataFailed(_)));
    }
}
