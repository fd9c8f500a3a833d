//! JSON bodies for errors produced outside the handlers.
//!
//! The body limit, the request timeout and the router itself reply with
//! plain-text (or empty) error bodies. This layer rewrites any such error into
//! the `{error, code, message}` shape handlers already use, keeping the status
//! and the other headers.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use pixstash_core::AppError;
use pixstash_infra::ErrorResponse;

/// Rewrite non-JSON error responses as JSON.
///
/// State is the per-file size limit reported back on 413s.
pub async fn json_error_middleware(
    State(max_file_size_bytes): State<u64>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let rendered = match status {
        StatusCode::PAYLOAD_TOO_LARGE => {
            // The body limiter does not say how far over the ceiling the request was
            let size = declared
                .filter(|size| *size > max_file_size_bytes)
                .unwrap_or_else(|| max_file_size_bytes.saturating_add(1));
            HttpAppError(AppError::PayloadTooLarge {
                size,
                limit: max_file_size_bytes,
            })
            .into_response()
        }
        StatusCode::REQUEST_TIMEOUT => HttpAppError(AppError::RequestTimeout(
            "Request took too long to complete".to_string(),
        ))
        .into_response(),
        StatusCode::NOT_FOUND => {
            HttpAppError(AppError::NotFound("Route not found".to_string())).into_response()
        }
        other => {
            tracing::debug!(status = other.as_u16(), "Request rejected outside handlers");
            (other, Json(status_error(other))).into_response()
        }
    };

    let (mut parts, _) = response.into_parts();
    let (rendered_parts, body) = rendered.into_parts();
    parts.status = rendered_parts.status;
    parts.headers.remove(CONTENT_LENGTH);
    if let Some(content_type) = rendered_parts.headers.get(CONTENT_TYPE) {
        parts.headers.insert(CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Body for statuses with no matching `AppError` variant, e.g. 405
fn status_error(status: StatusCode) -> ErrorResponse {
    let reason = status.canonical_reason().unwrap_or("Error");
    ErrorResponse {
        error: reason.to_string(),
        code: reason
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
            .collect::<String>()
            .to_uppercase()
            .replace(' ', "_"),
        message: reason.to_string(),
    }
}
