use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "pixstash";

const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /upload", "Upload a file (requires Bearer token)"),
    ("GET /uploads/{filename}", "Download a file"),
    ("GET /get/{filename}", "Download a file (alias)"),
    ("GET /files", "List all files"),
    ("DELETE /delete/{filename}", "Delete a file (requires Bearer token)"),
    ("GET /stats", "Get server statistics"),
    ("GET /health", "Health check"),
    ("GET /api/openapi.json", "OpenAPI document"),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    /// Header format expected by authenticated endpoints; never the token itself
    pub auth_header: String,
    pub webp_conversion: bool,
    pub webp_quality: u8,
    pub max_file_size_mb: u64,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service description and endpoint table", body = ServiceInfo)
    )
)]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    let config = &state.config;
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(route, description)| (route.to_string(), description.to_string()))
            .collect(),
        auth_header: "Authorization: Bearer <AUTH_TOKEN>".to_string(),
        webp_conversion: config.convert_to_webp,
        webp_quality: config.webp_quality,
        max_file_size_mb: config.max_file_size_mb(),
    })
}
