use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pixstash_core::models::UploadResponse;
use pixstash_infra::ErrorResponse;
use pixstash_processing::IngestError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "objects",
    description = "Store one file. JPEG, PNG and GIF uploads are converted to WebP when conversion is enabled; anything else is stored byte for byte. Requires `Authorization: Bearer <token>`.",
    request_body(content = String, description = "Multipart form with a single field named 'file'", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file field, malformed form or a body that is not multipart", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 408, description = "The request did not complete within the configured timeout", body = ErrorResponse),
        (status = 413, description = "File or request body exceeds the configured size limit", body = ErrorResponse),
        (status = 500, description = "The file could not be stored", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart.map_err(|e| IngestError::InvalidForm(e.body_text()))?;
    let limit = state.ingest.settings().max_file_size_bytes;
    let request = extract_upload(multipart, limit).await?;

    let object = state.ingest.ingest(request).await?;

    let url = state.object_url(&object.filename);
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse::from_stored(&object, url)),
    ))
}
