//! Pixstash Processing Library
//!
//! The upload ingest pipeline: size enforcement on the inbound stream, format
//! classification, WebP transcoding with verbatim fallback, and the orchestrator
//! that turns one upload into one stored object.

pub mod image;
pub mod ingest;

// Re-export commonly used types
pub use self::image::{transcode, ImageTranscoder, TranscodeError};
pub use ingest::{
    check_declared_size, clamp, classify, read_to_end, BoundedStream, FormatClass, IdGenerator,
    IngestError, IngestService, IngestSettings, SizeGuardError, SourceFormat, UploadRequest,
    UuidGenerator,
};
