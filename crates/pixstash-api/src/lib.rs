//! Pixstash API Library
//!
//! This crate provides the HTTP handlers, authentication middleware, and
//! application setup for the upload service.

mod api_doc;
mod handlers;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod middleware;
pub mod setup;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use pixstash_infra::ErrorResponse;
pub use state::AppState;
