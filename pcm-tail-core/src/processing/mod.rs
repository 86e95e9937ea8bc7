pub mod linearizer;
pub mod ring_buffer;
pub mod wav_format;
