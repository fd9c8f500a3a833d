//! Pixstash Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! usage-recording hook shared across all Pixstash components.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{ServiceStats, UsageRecorder};
