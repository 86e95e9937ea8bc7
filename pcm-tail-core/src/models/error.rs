use std::fmt;

use thiserror::Error;

/// Part of the output file a write failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The 44-byte WAV header.
    Header,
    /// Buffer bytes `[cursor, capacity)`, the oldest retained audio.
    Oldest,
    /// Buffer bytes `[0, cursor)`, the newest retained audio.
    Newest,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::Oldest => "oldest segment",
            Self::Newest => "newest segment",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while retaining and writing a PCM window.
///
/// `SourceReadFailed` is the only non-fatal variant: the session records it
/// on the result and still writes whatever was captured.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetentionError {
    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("failed to allocate a {capacity}-byte ring buffer")]
    AllocationFailed { capacity: usize },

    #[error("failed to open source: {0}")]
    SourceOpenFailed(String),

    #[error("source read failed at byte {offset}: {reason}")]
    SourceReadFailed { offset: u64, reason: String },

    #[error("failed to open sink: {0}")]
    SinkOpenFailed(String),

    #[error("short write in {segment}: wrote {written} of {expected} bytes")]
    ShortWrite {
        segment: Segment,
        expected: usize,
        written: usize,
    },

    #[error("write failed in {segment}: {reason}")]
    SinkWriteFailed { segment: Segment, reason: String },

    #[error("metadata error: {0}")]
    MetadataFailed(String),

    #[error("invalid WAV file: {0}")]
    InvalidWav(String),
}

impl RetentionError {
    /// Whether the session must stop when this error occurs.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::SourceReadFailed { .. })
    }
}
