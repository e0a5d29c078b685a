pub mod webp_transcoder;

pub use webp_transcoder::{TranscodeError, TranscodeOptions, WebpTranscoder};
