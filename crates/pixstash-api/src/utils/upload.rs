//! Multipart extraction for the upload handler

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::{header::CONTENT_LENGTH, StatusCode};
use pixstash_processing::{
    check_declared_size, clamp, read_to_end, IngestError, SizeGuardError, UploadRequest,
};

/// Name of the multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Pull the single `file` field out of the form, bounded to `max_bytes`.
///
/// Other fields are skipped. A part-level `Content-Length` above the ceiling is
/// rejected before any of the part is read; otherwise the part is read through
/// [`clamp`] so an oversized body fails as soon as it crosses the ceiling.
pub async fn extract_upload(
    mut multipart: Multipart,
    max_bytes: u64,
) -> Result<UploadRequest, IngestError> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(IngestError::InvalidForm(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let original_filename = field.file_name().unwrap_or_default().to_string();
        let declared_size = field
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(declared) = declared_size {
            check_declared_size(declared, max_bytes)?;
        }

        let content = read_to_end(clamp(Box::pin(field), max_bytes))
            .await
            .map_err(|e| read_error(e, max_bytes))?;

        let mut request = UploadRequest::new(original_filename, content);
        if let Some(declared) = declared_size {
            request = request.with_declared_size(declared);
        }
        upload = Some(request);
    }

    upload.ok_or(IngestError::MissingFile)
}

/// The transport only reports that its limit was crossed, not by how much.
fn transport_oversize(max_bytes: u64) -> IngestError {
    IngestError::OversizedPayload {
        size: max_bytes.saturating_add(1),
        limit: max_bytes,
    }
}

fn form_error(err: MultipartError, max_bytes: u64) -> IngestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return transport_oversize(max_bytes);
    }
    IngestError::InvalidForm(err.body_text())
}

fn read_error(err: SizeGuardError<MultipartError>, max_bytes: u64) -> IngestError {
    match err {
        SizeGuardError::Oversized { received, limit } => IngestError::OversizedPayload {
            size: received,
            limit,
        },
        SizeGuardError::Interrupted { source, .. }
            if source.status() == StatusCode::PAYLOAD_TOO_LARGE =>
        {
            transport_oversize(max_bytes)
        }
        SizeGuardError::Interrupted { received, source } => {
            tracing::warn!(
                received_bytes = received,
                error = %source,
                "Upload stream interrupted"
            );
            IngestError::Storage(format!(
                "upload interrupted after {} bytes: {}",
                received, source
            ))
        }
    }
}
