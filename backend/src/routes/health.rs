//! Health check endpoints
//!
//! - /health - Basic health check with store sizes
//! - /health/live - Liveness probe (always returns OK if server is running)

use crate::error::ApiResult;
use crate::repositories::{PostStore, UserStore};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Store sizes
#[derive(Serialize)]
pub struct HealthChecks {
    pub users: usize,
    pub posts: usize,
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let users = state.users().count().await?;
    let posts = state.posts().count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { users, posts }),
    }))
}

/// Liveness probe - checks if the service is alive
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}
