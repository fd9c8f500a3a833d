//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;
use pixstash_core::models;
use pixstash_infra::ErrorResponse;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixstash API",
        version = "0.1.0",
        description = "Single-directory object store. Uploaded JPEG, PNG and GIF images are re-encoded to WebP; everything else is stored as sent. Upload and delete require `Authorization: Bearer <token>`."
    ),
    paths(
        handlers::root::service_info,
        handlers::upload::upload_file,
        handlers::files::serve_file,
        handlers::files::list_files,
        handlers::delete::delete_file,
        handlers::stats::get_stats,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ObjectInfo,
            models::FileListResponse,
            models::DeleteResponse,
            models::Statistics,
            models::StatsResponse,
            models::HealthResponse,
            handlers::root::ServiceInfo,
            ErrorResponse,
        )
    ),
    tags(
        (name = "objects", description = "Upload, download, list and delete stored files"),
        (name = "service", description = "Service description, statistics and health")
    )
)]
pub struct ApiDoc;
