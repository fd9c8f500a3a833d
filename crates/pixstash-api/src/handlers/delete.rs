use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use pixstash_core::models::DeleteResponse;
use pixstash_core::UsageRecorder;
use pixstash_infra::ErrorResponse;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/delete/{filename}",
    tag = "objects",
    description = "Remove a stored object. Requires `Authorization: Bearer <token>`.",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 400, description = "Invalid filename", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let size = state.storage.delete(&filename).await?;
    state.stats.record_delete(size);

    tracing::info!(filename = %filename, size_bytes = size, "File deleted");

    Ok(Json(DeleteResponse {
        message: "File deleted successfully".to_string(),
        filename,
        size,
    }))
}
