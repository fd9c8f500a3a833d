//! Serving and listing stored objects

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use pixstash_core::models::{FileListResponse, ObjectInfo};
use pixstash_core::{AppError, UsageRecorder};
use pixstash_infra::ErrorResponse;
use std::io;
use std::sync::Arc;

/// RFC 7231 IMF-fixdate, as used by `Last-Modified`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "objects",
    params(
        ("filename" = String, Path, description = "Stored filename as returned by the upload response")
    ),
    responses(
        (status = 200, description = "Object content with a Content-Type guessed from the extension"),
        (status = 400, description = "Invalid filename", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_file"))]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    let (meta, stream) = state.storage.download_stream(&filename).await?;

    let content_type = mime_guess::from_path(&meta.key).first_or_octet_stream();
    let last_modified = meta.modified.format(HTTP_DATE_FORMAT).to_string();

    let body_stream = stream.map(|chunk| chunk.map_err(|e| io::Error::other(e.to_string())));

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, meta.size)
        .header(header::LAST_MODIFIED, last_modified)
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    state.stats.record_get();
    tracing::debug!(filename = %meta.key, size_bytes = meta.size, "Serving file");

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "objects",
    responses(
        (status = 200, description = "Every stored object", body = FileListResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let objects = state.storage.list().await?;

    let files = objects
        .into_iter()
        .map(|meta| ObjectInfo {
            url: state.object_url(&meta.key),
            name: meta.key,
            size: meta.size,
            modified: meta.modified,
        })
        .collect();

    Ok(Json(FileListResponse::new(files)))
}
