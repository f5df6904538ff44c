//! Ownership checks gating mutations
//!
//! Predicates are evaluated against current store state on every call.
//! Nothing here mutates or caches.

use crate::error::{ApiError, ApiResult};
use crate::repositories::PostStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthorizationPolicy {
    posts: Arc<dyn PostStore>,
}

impl AuthorizationPolicy {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// True iff `user_id` authored the post. `NotFound` if there is no such post.
    pub async fn is_post_author(&self, user_id: Uuid, post_id: Uuid) -> ApiResult<bool> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No post found with id of {}", post_id)))?;

        Ok(post.author_id == user_id)
    }

    /// True iff the acting user is the user being targeted
    pub fn is_self(requested_user_id: Uuid, acting_user_id: Uuid) -> bool {
        requested_user_id == acting_user_id
    }
}
