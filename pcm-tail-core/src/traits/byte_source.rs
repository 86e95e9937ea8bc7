use std::io::Read;

use crate::models::error::RetentionError;

/// A sequential, opaque source of raw PCM bytes.
///
/// The session opens the source once, after the ring buffer has been
/// allocated, and drains it until end of stream.
pub trait ByteSource {
    /// Short description for logs and results (e.g. a path or `stdin`).
    fn describe(&self) -> String;

    /// Open the stream for reading.
    ///
    /// Failures map to [`RetentionError::SourceOpenFailed`].
    fn open(&mut self) -> Result<Box<dyn Read + Send>, RetentionError>;
}
