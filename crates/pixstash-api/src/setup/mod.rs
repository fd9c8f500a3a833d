//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixstash_core::{Config, ServiceStats, UsageRecorder};
use pixstash_processing::{IngestService, IngestSettings};
use pixstash_storage::Storage;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    pixstash_infra::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;

    build_app(config, storage)
}

/// Wire state and routes around an already constructed storage backend.
///
/// Does not touch the global tracing subscriber, so tests can build as many
/// apps as they like.
pub fn build_app(
    config: Config,
    storage: Arc<dyn Storage>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = build_state(config, storage);
    let router = routes::setup_routes(&state.config, state.clone())?;
    Ok((state, router))
}

fn build_state(config: Config, storage: Arc<dyn Storage>) -> Arc<AppState> {
    let stats = Arc::new(ServiceStats::new());
    let ingest = IngestService::new(
        storage.clone(),
        stats.clone() as Arc<dyn UsageRecorder>,
        IngestSettings::from_config(&config),
    );

    Arc::new(AppState {
        config,
        storage,
        ingest: Arc::new(ingest),
        stats,
    })
}
