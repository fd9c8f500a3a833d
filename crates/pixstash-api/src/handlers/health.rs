//! Health check handler

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use pixstash_core::models::HealthResponse;
use std::sync::Arc;
use std::time::Duration;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Storage directory is accessible", body = HealthResponse),
        (status = 503, description = "Storage directory is not accessible", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) =
        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, state.storage.check_health()).await {
            Ok(Ok(())) => (StatusCode::OK, "healthy"),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Storage health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
            }
            Err(_) => {
                tracing::error!("Storage health check timed out");
                (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
            }
        };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            uptime: state.stats.uptime_display(),
        }),
    )
}
