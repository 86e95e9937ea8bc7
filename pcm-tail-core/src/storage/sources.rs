use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::models::error::RetentionError;
use crate::traits::byte_source::ByteSource;

/// Raw PCM read from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&mut self) -> Result<Box<dyn Read + Send>, RetentionError> {
        let file = File::open(&self.path)
            .map_err(|e| RetentionError::SourceOpenFailed(format!("{}: {}", self.path.display(), e)))?;
        Ok(Box::new(file))
    }
}

/// Wraps a stream that is already open, such as stdin or a test reader.
///
/// Can be opened once; a second `open` fails.
pub struct ReaderSource {
    name: String,
    reader: Option<Box<dyn Read + Send>>,
}

impl ReaderSource {
    pub fn new(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Some(Box::new(reader)),
        }
    }

    pub fn stdin() -> Self {
        Self::new("stdin", std::io::stdin())
    }
}

impl ByteSource for ReaderSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn open(&mut self) -> Result<Box<dyn Read + Send>, RetentionError> {
        self.reader
            .take()
            .ok_or_else(|| RetentionError::SourceOpenFailed(format!("{} was already consumed", self.name)))
    }
}
