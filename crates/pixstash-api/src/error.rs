//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`AppError`, `StorageError`, `IngestError`) convert into `HttpAppError`, which
//! renders the `{error, code, message}` body and logs at the variant's level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixstash_core::{AppError, ErrorMetadata, LogLevel};
use pixstash_infra::ErrorResponse;
use pixstash_processing::IngestError;
use pixstash_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from pixstash-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(msg) => AppError::InvalidFilename(msg),
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            StorageError::AlreadyExists(msg) => AppError::Persist(msg),
            StorageError::WriteFailed(msg) => AppError::Persist(msg),
            StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                code,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // client_message() hides paths and sources for sensitive variants
        let body = Json(ErrorResponse {
            error: app_error.error_type().to_string(),
            code: app_error.error_code().to_string(),
            message: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("/srv/uploads/x.png".into()).into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            other => panic!("Expected NotFound variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app_err) = StorageError::InvalidKey("Invalid filename".into()).into();
        assert_eq!(app_err.http_status_code(), 400);
        assert_eq!(app_err.error_code(), "INVALID_FILENAME");
    }

    #[test]
    fn test_from_storage_error_io_error_is_storage() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        assert!(matches!(app_err, AppError::Storage(_)));
        assert_eq!(app_err.client_message(), "Failed to access storage");
    }

    #[test]
    fn test_from_ingest_error() {
        let HttpAppError(app_err) = IngestError::OversizedPayload {
            size: 11,
            limit: 10,
        }
        .into();
        assert_eq!(app_err.http_status_code(), 413);

        let HttpAppError(app_err) = IngestError::MissingFile.into();
        assert_eq!(app_err.error_code(), "MISSING_FILE");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response =
            HttpAppError(AppError::Persist("/srv/uploads/abc.png: disk full".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Storage Error");
        assert_eq!(json["code"], "PERSIST_ERROR");
        assert_eq!(json["message"], "Failed to save file");
        assert!(!body.windows(4).any(|w| w == b"/srv"));
    }
}
