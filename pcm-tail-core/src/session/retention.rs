use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::IngestDiagnostics;
use crate::models::config::RetentionConfig;
use crate::models::error::RetentionError;
use crate::models::retention_result::RetentionResult;
use crate::models::state::SessionState;
use crate::processing::linearizer;
use crate::processing::ring_buffer::RingBuffer;
use crate::storage::wav_writer;
use crate::traits::byte_source::ByteSource;
use crate::traits::output_sink::OutputSink;
use crate::traits::session_delegate::SessionDelegate;

/// Cooperative cancellation for a running session.
///
/// Checked between chunk reads; a chunk already read is always appended.
/// Cancelling stops ingestion, and the window captured so far is written.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How ingestion ended.
struct IngestOutcome {
    source_error: Option<RetentionError>,
    cancelled: bool,
}

/// Drains a byte source into a ring buffer and writes the retained window
/// as a WAV file.
///
/// Data flow:
/// ```text
/// [ByteSource] → chunks → [RingBuffer] → linearize → [WavWriter] → [OutputSink]
/// ```
///
/// The ring buffer is owned by [`run`](Self::run) and released when it
/// returns, on success and on every error path. A session runs once.
pub struct RetentionSession {
    config: RetentionConfig,
    state: Arc<Mutex<SessionState>>,
    diagnostics: Arc<Mutex<IngestDiagnostics>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    cancel: CancelFlag,
}

impl RetentionSession {
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            diagnostics: Arc::new(Mutex::new(IngestDiagnostics::default())),
            delegate: None,
            cancel: CancelFlag::new(),
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Handle that stops ingestion at the next chunk boundary.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn diagnostics(&self) -> IngestDiagnostics {
        self.diagnostics.lock().clone()
    }

    /// Run the session: allocate, drain `source`, write to `sink`.
    ///
    /// A read failure mid-stream is not fatal: it is reported to the
    /// delegate, recorded in [`RetentionResult::source_error`], and the
    /// bytes captured before it are written. Every other failure ends the
    /// session with `Err` and leaves it in [`SessionState::Failed`].
    pub fn run(
        &mut self,
        source: &mut dyn ByteSource,
        sink: &mut dyn OutputSink,
    ) -> Result<RetentionResult, RetentionError> {
        if !self.state.lock().is_idle() {
            return Err(RetentionError::ConfigurationFailed(
                "session has already run".into(),
            ));
        }

        match self.run_inner(source, sink) {
            Ok(result) => {
                log::info!(
                    "saved {:.2}s of audio ({} bytes) to {}",
                    result.duration_secs,
                    result.bytes_retained,
                    result.output
                );
                self.set_state(SessionState::Completed(result.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_finished(&result);
                }
                Ok(result)
            }
            Err(e) => {
                log::error!("retention session failed: {}", e);
                self.set_state(SessionState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    fn run_inner(
        &mut self,
        source: &mut dyn ByteSource,
        sink: &mut dyn OutputSink,
    ) -> Result<RetentionResult, RetentionError> {
        self.config.validate().map_err(RetentionError::ConfigurationFailed)?;

        let capacity = self.config.capacity_bytes();
        self.set_state(SessionState::Allocating { capacity });
        let mut ring = RingBuffer::with_budget(capacity, self.config.max_buffer_bytes)?;
        log::info!(
            "allocated a {} MB ring buffer for {} seconds of audio",
            capacity / (1024 * 1024),
            self.config.window_secs
        );

        let mut reader = source.open()?;
        log::info!("reading {} into the ring buffer", source.describe());
        self.set_state(SessionState::Ingesting { bytes_ingested: 0 });
        let outcome = self.ingest(reader.as_mut(), &mut ring);
        drop(reader);

        log::debug!(
            "ingested {} bytes, oldest data starts at index {}",
            ring.total_written(),
            ring.cursor()
        );

        let payload = linearizer::payload(&ring, self.config.payload_policy);
        self.set_state(SessionState::Writing {
            payload_bytes: payload.len(),
        });

        let format = self.config.format();
        let out = sink.create()?;
        let checksum = wav_writer::write_wav(out, format, payload)?;

        Ok(RetentionResult {
            output: sink.describe(),
            format,
            policy: self.config.payload_policy,
            bytes_ingested: ring.total_written(),
            bytes_retained: payload.len(),
            wrapped: ring.has_wrapped(),
            cursor: ring.cursor(),
            duration_secs: format.duration_secs(payload.len() as u64),
            checksum,
            source_error: outcome.source_error,
            cancelled: outcome.cancelled,
        })
    }

    /// Read fixed-size chunks until end of stream, a read error, or cancel.
    fn ingest(&self, reader: &mut dyn Read, ring: &mut RingBuffer) -> IngestOutcome {
        let mut chunk = vec![0u8; self.config.chunk_size];

        loop {
            if self.cancel.is_cancelled() {
                log::info!("ingestion cancelled after {} bytes", ring.total_written());
                return IngestOutcome {
                    source_error: None,
                    cancelled: true,
                };
            }

            match reader.read(&mut chunk) {
                Ok(0) => {
                    return IngestOutcome {
                        source_error: None,
                        cancelled: false,
                    }
                }
                Ok(n) => {
                    ring.append(&chunk[..n]);

                    {
                        let mut d = self.diagnostics.lock();
                        d.chunks_read += 1;
                        d.bytes_ingested += n as u64;
                        d.wraps = ring.wraps();
                    }
                    *self.state.lock() = SessionState::Ingesting {
                        bytes_ingested: ring.total_written(),
                    };
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.diagnostics.lock().interrupted_reads += 1;
                }
                Err(e) => {
                    let error = RetentionError::SourceReadFailed {
                        offset: ring.total_written(),
                        reason: e.to_string(),
                    };
                    log::warn!("{}; keeping the {} bytes captured so far", error, ring.retained_len());
                    if let Some(ref delegate) = self.delegate {
                        delegate.on_source_error(&error);
                    }
                    return IngestOutcome {
                        source_error: Some(error),
                        cancelled: false,
                    };
                }
            }
        }
    }

    fn set_state(&self, new_state: SessionState) {
        *self.state.lock() = new_state.clone();
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }
}
