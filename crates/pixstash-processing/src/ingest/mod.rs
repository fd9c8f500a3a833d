//! Upload ingest pipeline
//!
//! stream → size guard → classify → transcode or verbatim write → stored object.

pub mod classifier;
pub mod error;
pub mod identity;
pub mod service;
pub mod size_guard;
pub mod types;

pub use classifier::{classify, FormatClass, SourceFormat};
pub use error::IngestError;
pub use identity::{IdGenerator, UuidGenerator};
pub use service::IngestService;
pub use size_guard::{check_declared_size, clamp, read_to_end, BoundedStream, SizeGuardError};
pub use types::{IngestSettings, UploadRequest};
