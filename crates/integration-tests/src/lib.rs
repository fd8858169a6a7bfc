//! Integration tests for Taskboard.
//!
//! The full router is driven in-process with `tower::ServiceExt::oneshot`
//! against the in-memory storage backend, so no database or running server
//! is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p taskboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `lists` - List and card routes
//! - `projects` - Project routes
//! - `seed` - Default lists on project creation
//! - `health` - Health checks and authentication

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use taskboard_api::config::{ApiConfig, StorageBackend};
use taskboard_api::db::Storage;
use taskboard_api::models::NewUser;
use taskboard_api::routes::build_router;
use taskboard_api::services::SeedScope;
use taskboard_api::state::AppState;
use taskboard_core::UserId;

/// API token accepted by every [`TestContext`].
pub const TEST_TOKEN: &str = "q8Zr2LwN5vKc7XpT1mHf4GjD9sYb3AeU";

/// A router over fresh in-memory storage.
pub struct TestContext {
    pub app: Router,
    pub storage: Storage,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context with the default (global) seed scope.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed_scope(SeedScope::Global)
    }

    /// Context with the given seed scope.
    #[must_use]
    pub fn with_seed_scope(seed_scope: SeedScope) -> Self {
        let config = ApiConfig {
            storage: StorageBackend::Memory,
            host: [127, 0, 0, 1].into(),
            port: 0,
            api_token: SecretString::from(TEST_TOKEN),
            seed_scope,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        let storage = Storage::memory();
        let app = build_router(AppState::new(config, storage.clone()));

        Self { app, storage }
    }

    /// Insert a user directly into storage.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    pub async fn create_user(&self, name: &str) -> UserId {
        self.storage
            .users
            .insert(NewUser {
                name: Some(name.to_string()),
            })
            .await
            .expect("user insert should succeed")
            .id
    }

    /// Send an authenticated request with an optional JSON body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_token(method, uri, body, Some(TEST_TOKEN))
            .await
    }

    /// Send a request with the given bearer token (or none).
    ///
    /// Returns the status and the body parsed as JSON. Empty bodies become
    /// `Value::Null` and non-JSON bodies a `Value::String`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body should be readable")
            .to_bytes();

        if bytes.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }
}
