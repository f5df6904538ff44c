//! Authentication middleware
//!
//! Resolves the bearer token on a request into the acting identity.
//! Handlers never take "who is acting" from the request body; only from here.

use crate::error::ApiError;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authenticated identity extracted from a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::InvalidToken("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::InvalidToken("Invalid authorization format".to_string()))
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Set by `auth_middleware` when the route group is layered
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        AuthService::authenticate(app_state.jwt(), token)
    }
}

/// Middleware function for authentication (alternative to extractor)
///
/// Use this when you need to apply auth to a group of routes via layer.
/// The resolved [`AuthUser`] is stored in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let user = AuthService::authenticate(state.jwt(), token)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
