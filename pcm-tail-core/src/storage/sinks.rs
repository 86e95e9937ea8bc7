use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::RetentionError;
use crate::traits::output_sink::OutputSink;

/// WAV output written to a file, truncating any existing content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn create(&mut self) -> Result<Box<dyn Write + Send>, RetentionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| RetentionError::SinkOpenFailed(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(&self.path)
            .map_err(|e| RetentionError::SinkOpenFailed(format!("{}: {}", self.path.display(), e)))?;
        Ok(Box::new(file))
    }
}

/// In-memory sink whose contents stay readable after the session ends.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    data: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }
}

impl OutputSink for MemorySink {
    fn describe(&self) -> String {
        "memory".into()
    }

    fn create(&mut self) -> Result<Box<dyn Write + Send>, RetentionError> {
        self.data.lock().clear();
        Ok(Box::new(MemoryWriter {
            data: Arc::clone(&self.data),
        }))
    }
}

struct MemoryWriter {
    data: Arc<Mutex<Vec<u8>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
