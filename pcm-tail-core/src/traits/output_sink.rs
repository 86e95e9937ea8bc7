use std::io::Write;

use crate::models::error::RetentionError;

/// Destination for the finished WAV file.
///
/// `create` is called once per session and must start from empty content,
/// truncating anything already there.
pub trait OutputSink {
    /// Short description for logs and results.
    fn describe(&self) -> String;

    /// Create (or truncate) the destination.
    ///
    /// Failures map to [`RetentionError::SinkOpenFailed`].
    fn create(&mut self) -> Result<Box<dyn Write + Send>, RetentionError>;
}
