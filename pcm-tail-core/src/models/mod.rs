pub mod audio_models;
pub mod config;
pub mod error;
pub mod retention_result;
pub mod state;
