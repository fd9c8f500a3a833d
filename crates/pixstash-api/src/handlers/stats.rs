use crate::state::AppState;
use axum::{extract::State, Json};
use pixstash_core::models::{Statistics, StatsResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/stats",
    tag = "service",
    responses(
        (status = 200, description = "Request counters since startup", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let snapshot = state.stats.snapshot();
    Json(StatsResponse {
        statistics: Statistics {
            uploads: snapshot.uploads,
            gets: snapshot.gets,
            deletes: snapshot.deletes,
        },
        uptime: state.stats.uptime_display(),
    })
}
