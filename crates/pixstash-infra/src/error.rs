//! HTTP error response body
//!
//! The `IntoResponse` implementation for `AppError` lives in the binary crate
//! (pixstash-api) because of the orphan rule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short title, e.g. "File Too Large"
    pub error: String,
    /// Machine-readable code, e.g. "PAYLOAD_TOO_LARGE"
    pub code: String,
    pub message: String,
}
