use std::fs::File;
use std::io::Read;
use std::path::Path;

use pcm_tail_core::storage::metadata;
use pcm_tail_core::{
    ByteSource, FileSink, FileSource, PayloadPolicy, ReaderSource, RetentionConfig, RetentionError,
    RetentionMetadata, RetentionSession, WavHeader, WAV_HEADER_SIZE,
};

use crate::log_delegate::LogDelegate;
use crate::CaptureArgs;

/// Build the session configuration from an optional file plus flag overrides.
pub fn resolve_config(args: &CaptureArgs) -> Result<RetentionConfig, RetentionError> {
    let mut config = match args.config {
        Some(ref path) => RetentionConfig::load_json(path)?,
        None => RetentionConfig::default(),
    };

    if let Some(seconds) = args.seconds {
        config.window_secs = seconds;
    }
    if let Some(rate) = args.rate {
        config.sample_rate = rate;
    }
    if let Some(channels) = args.channels {
        config.channels = channels;
    }
    if let Some(bytes) = args.bytes_per_sample {
        config.bytes_per_sample = bytes;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if args.max_buffer_bytes.is_some() {
        config.max_buffer_bytes = args.max_buffer_bytes;
    }
    if args.captured_only {
        config.payload_policy = PayloadPolicy::CapturedOnly;
    }
    Ok(config)
}

pub fn capture(args: CaptureArgs) -> Result<(), RetentionError> {
    let config = resolve_config(&args)?;
    let mut session = RetentionSession::new(config);
    session.set_delegate(LogDelegate::new());

    let cancel = session.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        log::warn!("Ctrl-C handler unavailable: {}", e);
    }

    let mut source: Box<dyn ByteSource> = if args.input == "-" {
        Box::new(ReaderSource::stdin())
    } else {
        Box::new(FileSource::new(&args.input))
    };
    let mut sink = FileSink::new(&args.output);

    let result = session.run(source.as_mut(), &mut sink)?;

    if args.metadata {
        let sidecar = RetentionMetadata::from_result(&result, &args.output);
        let path = metadata::write_metadata(&sidecar, &args.output)?;
        log::info!("metadata written to {}", path.display());
    }
    Ok(())
}

pub fn inspect(path: &Path) -> Result<(), RetentionError> {
    let mut bytes = [0u8; WAV_HEADER_SIZE];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut bytes))
        .map_err(|e| RetentionError::InvalidWav(format!("failed to read header of {}: {}", path.display(), e)))?;

    let header =
        WavHeader::parse(&bytes).map_err(|e| RetentionError::InvalidWav(format!("{}: {}", path.display(), e)))?;

    println!("file:            {}", path.display());
    println!("audio format:    {}", header.audio_format);
    println!("channels:        {}", header.channels);
    println!("sample rate:     {} Hz", header.sample_rate);
    println!("bits per sample: {}", header.bits_per_sample);
    println!("byte rate:       {}", header.byte_rate);
    println!("block align:     {}", header.block_align);
    println!("data size:       {} bytes", header.data_size);
    println!("duration:        {:.3} s", header.duration_secs());
    Ok(())
}
