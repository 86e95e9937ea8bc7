//! pcm-tail: keep the last N seconds of a raw PCM stream as a WAV file.
//!
//! # Usage
//!
//! ```bash
//! # Keep the last two minutes of a 44.1 kHz stereo 16-bit capture
//! arecord -f cd -t raw | pcm-tail capture - -o last.wav
//!
//! # Ten seconds of 16 kHz mono from a file, trimmed if the file is shorter
//! pcm-tail capture input.raw -o tail.wav --seconds 10 --rate 16000 --channels 1 --captured-only
//!
//! # Print the header of a written file
//! pcm-tail inspect tail.wav
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

mod commands;
mod log_delegate;

/// Retain the most recent window of a raw PCM stream and save it as WAV.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drain a raw PCM stream and write its last window as WAV
    Capture(CaptureArgs),
    /// Print the WAV header of a file
    Inspect {
        /// WAV file to read
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Raw PCM input file, or '-' for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Output WAV file (truncated if it exists)
    #[arg(short, long, default_value = "output.wav")]
    pub output: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long, env = "PCM_TAIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seconds of audio to retain
    #[arg(short, long)]
    pub seconds: Option<u32>,

    /// Sample rate in Hz
    #[arg(short, long)]
    pub rate: Option<u32>,

    /// Interleaved channel count
    #[arg(short, long)]
    pub channels: Option<u16>,

    /// Bytes per single-channel sample (1-4)
    #[arg(long)]
    pub bytes_per_sample: Option<u16>,

    /// Read granularity in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Refuse windows larger than this many bytes
    #[arg(long)]
    pub max_buffer_bytes: Option<usize>,

    /// Emit only captured bytes when the stream is shorter than the window
    #[arg(long)]
    pub captured_only: bool,

    /// Also write a <output>.metadata.json sidecar
    #[arg(long)]
    pub metadata: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let outcome = match cli.command {
        Command::Capture(args) => commands::capture(args),
        Command::Inspect { file } => commands::inspect(&file),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
