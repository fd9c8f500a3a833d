//! Test helpers: build AppState and router for integration tests.
//!
//! Each app gets its own temporary upload directory. Run with
//! `cargo test -p pixstash-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use pixstash_api::setup;
use pixstash_api::state::AppState;
use pixstash_core::Config;
use pixstash_storage::LocalStorage;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "test-token-3f9a1c";
pub const TEST_BASE_URL: &str = "http://files.test";

/// Test application: server, state, and owned upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Names of everything in the upload directory, sorted
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read_stored(&self, filename: &str) -> Vec<u8> {
        std::fs::read(self.upload_dir().join(filename)).unwrap()
    }

    /// POST `data` as the `file` field with the test token
    pub async fn upload(&self, filename: &str, data: Vec<u8>) -> TestResponse {
        let part = Part::bytes(bytes::Bytes::from(data)).file_name(filename.to_string());
        let form = MultipartForm::new().add_part("file", part);
        self.server
            .post("/upload")
            .add_header("Authorization", format!("Bearer {}", TEST_TOKEN))
            .multipart(form)
            .await
    }

    pub async fn delete(&self, filename: &str) -> TestResponse {
        self.server
            .delete(&format!("/delete/{}", filename))
            .add_header("Authorization", format!("Bearer {}", TEST_TOKEN))
            .await
    }
}

/// Setup test app with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, letting the caller adjust the config first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let (router, state, temp_dir) = build_router_with(configure).await;

    TestApp {
        server: TestServer::new(router).unwrap(),
        state,
        temp_dir,
    }
}

/// The full router without a test server, for requests built by hand.
pub async fn build_router_with(
    configure: impl FnOnce(&mut Config),
) -> (axum::Router, Arc<AppState>, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let mut config = Config {
        upload_dir: temp_dir.path().to_path_buf(),
        auth_token: TEST_TOKEN.to_string(),
        base_url: TEST_BASE_URL.to_string(),
        ..Config::default()
    };
    configure(&mut config);

    let storage = LocalStorage::new(config.upload_dir.clone()).await.unwrap();
    let (state, router) = setup::build_app(config, Arc::new(storage)).unwrap();

    (router, state, temp_dir)
}
