//! Post store

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chirp_shared::types::PostResponse;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Post record as held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRecord> for PostResponse {
    fn from(post: PostRecord) -> Self {
        PostResponse {
            id: post.id,
            body: post.body,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Port for post storage
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a new post. Any body is accepted, including an empty one.
    async fn create(&self, body: String, author_id: Uuid) -> ApiResult<PostRecord>;

    /// All posts, in insertion order
    async fn find_all(&self) -> ApiResult<Vec<PostRecord>>;

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<PostRecord>>;

    /// Number of stored posts, without copying any record
    async fn count(&self) -> ApiResult<usize>;

    /// Posts by one author, in insertion order
    async fn find_by_author_id(&self, author_id: Uuid) -> ApiResult<Vec<PostRecord>>;

    /// Replace the body and refresh `updated_at`
    async fn update(&self, id: Uuid, body: String) -> ApiResult<PostRecord>;

    /// Remove a post and return it
    async fn remove(&self, id: Uuid) -> ApiResult<PostRecord>;
}

/// Volatile post store living for the lifetime of its owner
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<PostRecord>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, body: String, author_id: Uuid) -> ApiResult<PostRecord> {
        let now = Utc::now();
        let post = PostRecord {
            id: Uuid::new_v4(),
            body,
            author_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn find_all(&self) -> ApiResult<Vec<PostRecord>> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<PostRecord>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn count(&self) -> ApiResult<usize> {
        Ok(self.posts.read().await.len())
    }

    async fn find_by_author_id(&self, author_id: Uuid) -> ApiResult<Vec<PostRecord>> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, body: String) -> ApiResult<PostRecord> {
        let mut posts = self.posts.write().await;
        let post = posts.iter_mut().find(|post| post.id == id).ok_or_else(|| {
            ApiError::NotFound(format!("Could not update post: No post found with id of {}", id))
        })?;

        post.body = body;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn remove(&self, id: Uuid) -> ApiResult<PostRecord> {
        let mut posts = self.posts.write().await;
        let idx = posts.iter().position(|post| post.id == id).ok_or_else(|| {
            ApiError::NotFound(format!("Could not remove post: No post found with id of {}", id))
        })?;

        Ok(posts.remove(idx))
    }
}
