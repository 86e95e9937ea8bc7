pub mod metadata;
pub mod sinks;
pub mod sources;
pub mod wav_writer;
