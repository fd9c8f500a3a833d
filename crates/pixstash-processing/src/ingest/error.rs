use pixstash_core::AppError;

/// Failures that abort an ingest
///
/// Decode and encode failures are not listed: they are absorbed by the
/// verbatim fallback and only show up in the stored object's conversion outcome.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("no file provided")]
    MissingFile,

    #[error("invalid multipart form: {0}")]
    InvalidForm(String),

    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    OversizedPayload { size: u64, limit: u64 },

    #[error("failed to read upload: {0}")]
    Storage(String),

    #[error("failed to persist upload: {0}")]
    Persist(String),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MissingFile => AppError::MissingFile,
            IngestError::InvalidForm(msg) => AppError::InvalidInput(msg),
            IngestError::OversizedPayload { size, limit } => {
                AppError::PayloadTooLarge { size, limit }
            }
            IngestError::Storage(msg) => AppError::Storage(msg),
            IngestError::Persist(msg) => AppError::Persist(msg),
        }
    }
}
