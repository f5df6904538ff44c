//! Common test utilities for integration tests
//!
//! Each `TestApp` owns a fresh in-memory state, so tests never share data.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chirp_backend::{config::AppConfig, routes, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        let state = AppState::in_memory(test_config()).expect("Failed to build test state");
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    /// Send a request and decode the JSON response (Null for an empty body)
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request("GET", path, None, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, None, Some(body)).await
    }

    /// Sign up a user and return its id
    pub async fn sign_up(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/signup",
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Sign up and log in, returning (user id, token)
    pub async fn register(&self, email: &str) -> (String, String) {
        let id = self.sign_up(email, "correct-horse").await;
        let token = self.login(email, "correct-horse").await;
        (id, token)
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    // Minimum bcrypt cost keeps the suite fast
    config.password.bcrypt_cost = 4;
    config
}
