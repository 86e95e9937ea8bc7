//! # pcm-tail-core
//!
//! Keeps the most recent N seconds of a raw, headerless PCM stream in a
//! fixed-size ring buffer and writes that window out as a WAV file.
//!
//! Sources and sinks are traits, so the same session drains a file, stdin,
//! or any reader, and writes to a file or memory.
//!
//! ## Architecture
//!
//! ```text
//! pcm-tail-core (this crate)
//! ├── traits/       ← ByteSource, OutputSink, SessionDelegate
//! ├── models/       ← RetentionError, SessionState, RetentionConfig, PcmFormat, etc.
//! ├── processing/   ← RingBuffer, linearizer, WAV header generation
//! ├── session/      ← RetentionSession (ingest → linearize → write)
//! └── storage/      ← file/reader sources, file/memory sinks, WavWriter, metadata
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{IngestDiagnostics, PayloadPolicy, PcmFormat};
pub use models::config::RetentionConfig;
pub use models::error::{RetentionError, Segment};
pub use models::retention_result::{RetentionMetadata, RetentionResult};
pub use models::state::SessionState;
pub use processing::linearizer::{linearize, Payload};
pub use processing::ring_buffer::RingBuffer;
pub use processing::wav_format::{WavHeader, WAV_HEADER_SIZE};
pub use session::retention::{CancelFlag, RetentionSession};
pub use storage::sinks::{FileSink, MemorySink};
pub use storage::sources::{FileSource, ReaderSource};
pub use storage::wav_writer::WavWriter;
pub use traits::byte_source::ByteSource;
pub use traits::output_sink::OutputSink;
pub use traits::session_delegate::SessionDelegate;
