//! Storage setup and initialization

use anyhow::{Context, Result};
use pixstash_core::Config;
use pixstash_storage::{create_storage, Storage};
use std::sync::Arc;

/// Open the upload directory and log what is already in it.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(upload_dir = %config.upload_dir.display(), "Initializing storage...");
    let storage = create_storage(config)
        .await
        .with_context(|| format!("Failed to open upload directory {}", config.upload_dir.display()))?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        max_file_size_mb = config.max_file_size_mb(),
        convert_to_webp = config.convert_to_webp,
        webp_quality = config.webp_quality,
        "Storage initialized"
    );

    log_existing_files(storage.as_ref()).await;

    Ok(storage)
}

async fn log_existing_files(storage: &dyn Storage) {
    let objects = match storage.list().await {
        Ok(objects) => objects,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read upload directory");
            return;
        }
    };

    if objects.is_empty() {
        tracing::info!("Upload directory is empty");
        return;
    }

    let total_bytes: u64 = objects.iter().map(|o| o.size).sum();
    tracing::info!(count = objects.len(), total_bytes, "Found existing files");
    for object in &objects {
        tracing::debug!(filename = %object.key, size_bytes = object.size, "Existing file");
    }
}
