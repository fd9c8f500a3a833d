use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pixstash_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct AuthState {
    pub token: String,
}

impl AuthState {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &"<redacted>")
            .finish()
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized() -> Response {
    HttpAppError(AppError::Unauthorized(
        "Missing or invalid authorization header".to_string(),
    ))
    .into_response()
}

/// Require `Authorization: Bearer <token>` matching the configured token.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!(path = %request.uri().path(), "Missing authorization header");
            return unauthorized();
        }
    };

    let token = match auth_header.strip_prefix(BEARER_PREFIX) {
        Some(token) => token.trim(),
        None => {
            tracing::debug!(path = %request.uri().path(), "Authorization header is not a bearer token");
            return unauthorized();
        }
    };

    if auth_state.token.is_empty() || !secure_compare(token, &auth_state.token) {
        tracing::warn!(path = %request.uri().path(), "Rejected request with invalid bearer token");
        return unauthorized();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;

    fn server(token: &str) -> TestServer {
        let app = Router::new()
            .route("/upload", post(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                Arc::new(AuthState::new(token)),
                auth_middleware,
            ));
        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("secret", "secret"));
        assert!(!secure_compare("secret", "secreT"));
        assert!(!secure_compare("secret", "secret2"));
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let response = server("s3cr3t")
            .post("/upload")
            .add_header("Authorization", "Bearer s3cr3t")
            .await;
        response.assert_status_ok();
        response.assert_text("ok");
    }

    #[tokio::test]
    async fn test_missing_header_is_401_json() {
        let response = server("s3cr3t").post("/upload").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_wrong_scheme_and_wrong_token_rejected() {
        let server = server("s3cr3t");
        server
            .post("/upload")
            .add_header("Authorization", "Basic s3cr3t")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/upload")
            .add_header("Authorization", "Bearer nope")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_configured_token_rejects_everything() {
        server("")
            .post("/upload")
            .add_header("Authorization", "Bearer ")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
