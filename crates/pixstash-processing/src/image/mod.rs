//! Image processing module
//!
//! Decoding of the convertible source formats and lossy WebP encoding.

pub mod transcoder;

pub use transcoder::{transcode, ImageTranscoder, TranscodeError, MAX_WEBP_DIMENSION};
