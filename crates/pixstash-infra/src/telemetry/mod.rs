//! Tracing initialization
//!
//! Installs the global subscriber: an `EnvFilter` (overridable with `RUST_LOG`)
//! and a console formatter chosen by `LOG_FORMAT`.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, DEFAULT_FILTER};
