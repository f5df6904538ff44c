//! Authentication routes
//!
//! Sign-up, login, and the profile of the current identity.

use crate::auth::{auth_middleware, AuthUser};
use crate::error::ApiResult;
use crate::services::{AuthService, UserService};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chirp_shared::types::{AuthToken, LoginRequest, SignUpRequest, UserProfile};
use validator::Validate;

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route(
            "/me",
            get(get_me).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new user
///
/// POST /api/v1/auth/signup
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    req.validate()?;
    let profile = UserService::sign_up(state.users(), state.passwords(), req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthToken>> {
    req.validate()?;
    let token = AuthService::login(
        state.users(),
        state.passwords(),
        state.jwt(),
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(token))
}

/// Get current user profile (requires authentication)
///
/// GET /api/v1/auth/me
async fn get_me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_user(state.users(), auth_user.user_id).await?;
    Ok(Json(profile))
}
