//! Hooks and traits for usage recording
//!
//! The ingest pipeline and the serving handlers report successful operations
//! through [`UsageRecorder`] instead of touching shared globals. The default
//! implementation, [`ServiceStats`], keeps lock-free counters read by `/stats`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Trait for reporting completed operations
///
/// Implementations must be cheap and infallible; callers only invoke these
/// after the operation has been confirmed.
pub trait UsageRecorder: Send + Sync {
    /// An object was stored; `bytes` is the size actually written
    fn record_upload(&self, bytes: u64);

    /// An object was served
    fn record_get(&self);

    /// An object was deleted; `bytes` is the size it had
    fn record_delete(&self, bytes: u64);
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub uploads: u64,
    pub gets: u64,
    pub deletes: u64,
    pub bytes_uploaded: u64,
}

/// Process-lifetime operation counters
#[derive(Debug)]
pub struct ServiceStats {
    uploads: AtomicU64,
    gets: AtomicU64,
    deletes: AtomicU64,
    bytes_uploaded: AtomicU64,
    started_at: Instant,
}

impl Default for ServiceStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceStats {
    pub fn new() -> Self {
        Self {
            uploads: AtomicU64::new(0),
            gets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            bytes_uploaded: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            bytes_uploaded: self.bytes_uploaded.load(Ordering::Relaxed),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Uptime rendered as e.g. `2h3m4s`
    pub fn uptime_display(&self) -> String {
        format_duration(self.uptime())
    }
}

impl UsageRecorder for ServiceStats {
    fn record_upload(&self, bytes: u64) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        self.bytes_uploaded.fetch_add(bytes, Ordering::Relaxed);
    }

    fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    fn record_delete(&self, _bytes: u64) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
