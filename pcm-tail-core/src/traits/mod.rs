pub mod byte_source;
pub mod output_sink;
pub mod session_delegate;
