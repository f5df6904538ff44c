//! User routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{PostService, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chirp_shared::types::{FollowRequest, PostResponse, UpdateUserRequest, UserProfile};

use super::parse_id;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/follow", post(follow_user))
        .route("/:id", get(get_user).patch(update_user))
        .route("/:id/posts", get(posts_by_author))
        .route("/:id/followers", get(followers_of))
        .route("/:id/following", get(following_of))
}

/// GET /api/v1/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(UserService::list_users(state.users()).await?))
}

/// GET /api/v1/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(UserService::get_user(state.users(), id).await?))
}

/// PATCH /api/v1/users/:id - owner only
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let id = parse_id(&id, "user")?;
    let policy = state.policy();
    let profile = UserService::update_user(state.users(), &policy, &auth, id, req).await?;
    Ok(Json(profile))
}

/// POST /api/v1/users/follow - follow a user by email
async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FollowRequest>,
) -> ApiResult<Json<UserProfile>> {
    let target = UserService::follow_user(state.users(), &auth, &req.email).await?;
    Ok(Json(target))
}

/// GET /api/v1/users/:id/posts
async fn posts_by_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let id = parse_id(&id, "user")?;
    let posts = PostService::posts_by_author(state.users(), state.posts(), id).await?;
    Ok(Json(posts))
}

/// GET /api/v1/users/:id/followers
async fn followers_of(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(UserService::followers_of(state.users(), id).await?))
}

/// GET /api/v1/users/:id/following
async fn following_of(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    let id = parse_id(&id, "user")?;
    Ok(Json(UserService::following_of(state.users(), id).await?))
}
