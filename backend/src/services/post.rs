//! Post operations
//!
//! Reads are public. Creation needs an authenticated identity, which becomes
//! the author. Updates and removals are gated on authorship.

use crate::auth::{AuthUser, AuthorizationPolicy, Guard, GuardChain};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{PostStore, UserStore};
use chirp_shared::types::{PostResponse, UserProfile};
use tracing::info;
use uuid::Uuid;

pub struct PostService;

impl PostService {
    /// Create a post authored by the acting identity
    pub async fn create_post(
        posts: &dyn PostStore,
        identity: &AuthUser,
        body: String,
    ) -> ApiResult<PostResponse> {
        let post = posts.create(body, identity.user_id).await?;

        info!(user_id = %identity.user_id, post_id = %post.id, "Post created");
        Ok(post.into())
    }

    /// All posts, in creation order
    pub async fn list_posts(posts: &dyn PostStore) -> ApiResult<Vec<PostResponse>> {
        Ok(posts.find_all().await?.into_iter().map(Into::into).collect())
    }

    pub async fn get_post(posts: &dyn PostStore, id: Uuid) -> ApiResult<PostResponse> {
        posts
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApiError::NotFound(format!("No post found with id of {}", id)))
    }

    /// Posts written by one user, in creation order
    pub async fn posts_by_author(
        users: &dyn UserStore,
        posts: &dyn PostStore,
        author_id: Uuid,
    ) -> ApiResult<Vec<PostResponse>> {
        if users.find_by_id(author_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "No user found with id of {}",
                author_id
            )));
        }

        Ok(posts
            .find_by_author_id(author_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Resolve the author of a post through the user store
    pub async fn post_author(
        users: &dyn UserStore,
        posts: &dyn PostStore,
        post_id: Uuid,
    ) -> ApiResult<UserProfile> {
        let post = Self::get_post(posts, post_id).await?;
        users
            .find_by_id(post.author_id)
            .await?
            .map(|user| user.to_profile())
            .ok_or_else(|| ApiError::NotFound(format!("No user found with id of {}", post.author_id)))
    }

    /// Replace a post's body; only its author may do so
    pub async fn update_post(
        posts: &dyn PostStore,
        policy: &AuthorizationPolicy,
        identity: &AuthUser,
        post_id: Uuid,
        body: String,
    ) -> ApiResult<PostResponse> {
        GuardChain::new()
            .require(Guard::PostAuthor(post_id))
            .enforce(policy, identity)
            .await?;

        let post = posts.update(post_id, body).await?;

        info!(user_id = %identity.user_id, post_id = %post.id, "Post updated");
        Ok(post.into())
    }

    /// Remove a post; only its author may do so
    pub async fn remove_post(
        posts: &dyn PostStore,
        policy: &AuthorizationPolicy,
        identity: &AuthUser,
        post_id: Uuid,
    ) -> ApiResult<PostResponse> {
        GuardChain::new()
            .require(Guard::PostAuthor(post_id))
            .enforce(policy, identity)
            .await?;

        let post = posts.remove(post_id).await?;

        info!(user_id = %identity.user_id, post_id = %post.id, "Post removed");
        Ok(post.into())
    }
}
