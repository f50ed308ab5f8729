/// Common test utilities for HTTP-level tests
///
/// Builds the full router over the in-memory stores with cheap Argon2
/// parameters, and provides small request/response helpers.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tasktrack_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config},
};
use tasktrack_shared::{
    auth::{jwt::TokenConfig, password::HashingParams},
    db::pool::DatabaseConfig,
    store::memory::{MemoryCredentialStore, MemoryTaskStore},
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "http-test-secret-key-at-least-32-bytes";

/// Test context holding a router over fresh in-memory stores
pub struct TestContext {
    pub app: Router,
    pub credentials: Arc<MemoryCredentialStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_ttl(3600)
    }

    pub fn with_ttl(ttl_seconds: i64) -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig::new("postgresql://localhost/unused"),
            jwt: TokenConfig::new(TEST_SECRET).with_ttl_seconds(ttl_seconds),
            password: HashingParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        };

        let credentials = Arc::new(MemoryCredentialStore::new());
        let state = AppState::new(config, credentials.clone(), Arc::new(MemoryTaskStore::new()))
            .expect("Failed to build app state");

        Self {
            app: build_router(state),
            credentials,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// The body is `Value::Null` when the response has no JSON content.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    /// Registers `username` and returns the issued token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Logs in and returns the issued token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}
