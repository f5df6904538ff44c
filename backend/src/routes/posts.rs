//! Post routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chirp_shared::types::{CreatePostRequest, PostResponse, UpdatePostRequest, UserProfile};

use super::parse_id;

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).patch(update_post).delete(remove_post))
        .route("/:id/author", get(post_author))
}

/// GET /api/v1/posts
async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<PostResponse>>> {
    Ok(Json(PostService::list_posts(state.posts()).await?))
}

/// POST /api/v1/posts - author is the authenticated user
async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = PostService::create_post(state.posts(), &auth, req.body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts/:id
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let id = parse_id(&id, "post")?;
    Ok(Json(PostService::get_post(state.posts(), id).await?))
}

/// PATCH /api/v1/posts/:id - author only
async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let id = parse_id(&id, "post")?;
    let policy = state.policy();
    let post = PostService::update_post(state.posts(), &policy, &auth, id, req.body).await?;
    Ok(Json(post))
}

/// DELETE /api/v1/posts/:id - author only
async fn remove_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let id = parse_id(&id, "post")?;
    let policy = state.policy();
    let post = PostService::remove_post(state.posts(), &policy, &auth, id).await?;
    Ok(Json(post))
}

/// GET /api/v1/posts/:id/author
async fn post_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let id = parse_id(&id, "post")?;
    Ok(Json(PostService::post_author(state.users(), state.posts(), id).await?))
}
