//! Application state shared by every handler.

use pixstash_core::{Config, ServiceStats};
use pixstash_processing::IngestService;
use pixstash_storage::Storage;
use std::sync::Arc;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub ingest: Arc<IngestService>,
    /// Request counters; also the ingest service's usage recorder
    pub stats: Arc<ServiceStats>,
}

impl AppState {
    /// Public URL of a stored object
    pub fn object_url(&self, filename: &str) -> String {
        self.config.object_url(filename)
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
