//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use coursehub_core::config::{AppConfig, StorageProvider};
use coursehub_database::MemoryDocumentStore;

/// Test application context over an in-memory store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
}

impl TestApp {
    /// Create a new test application with an empty store.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.storage.provider = StorageProvider::Memory;
        config.logging.directory = std::env::temp_dir()
            .join("coursehub-api-tests")
            .display()
            .to_string();
        let router = coursehub_api::app_with_store(config, Arc::new(MemoryDocumentStore::new()))
            .expect("Failed to build app");
        Self { router }
    }

    /// Send a request and parse the JSON response.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_as(method, path, body, None).await
    }

    /// Send a request with an `x-user-id` header.
    pub async fn request_as(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(user) = user {
            req = req.header("x-user-id", user);
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a record and return its id.
    pub async fn create(&self, path: &str, body: Value) -> String {
        let response = self.request("POST", path, Some(body)).await;
        assert_eq!(response.status, StatusCode::OK, "create failed: {}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("created record has an id")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
