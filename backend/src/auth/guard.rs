//! Guard chains
//!
//! A handler that mutates owned data first authenticates (the [`AuthUser`]
//! extractor), then runs a [`GuardChain`]: an ordered list of authorization
//! predicates, each of which may short-circuit the request with an error.

use super::middleware::AuthUser;
use super::policy::AuthorizationPolicy;
use crate::error::{ApiError, ApiResult};
use tracing::warn;
use uuid::Uuid;

/// One authorization predicate over the acting identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The acting user must have authored this post
    PostAuthor(Uuid),
    /// The acting user must be this user
    SelfProfile(Uuid),
}

impl Guard {
    async fn check(&self, policy: &AuthorizationPolicy, identity: &AuthUser) -> ApiResult<()> {
        match *self {
            Guard::PostAuthor(post_id) => {
                if policy.is_post_author(identity.user_id, post_id).await? {
                    Ok(())
                } else {
                    warn!(user_id = %identity.user_id, post_id = %post_id, "Rejected write to another user's post");
                    Err(ApiError::Unauthorized(
                        "Only the author can modify this post".to_string(),
                    ))
                }
            }
            Guard::SelfProfile(user_id) => {
                if AuthorizationPolicy::is_self(user_id, identity.user_id) {
                    Ok(())
                } else {
                    warn!(user_id = %identity.user_id, target = %user_id, "Rejected write to another user's profile");
                    Err(ApiError::Unauthorized(
                        "Only the owner can modify this profile".to_string(),
                    ))
                }
            }
        }
    }
}

/// Ordered authorization predicates, run before a mutation
#[derive(Debug, Clone, Default)]
pub struct GuardChain {
    guards: Vec<Guard>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Run every guard in order, stopping at the first failure
    pub async fn enforce(&self, policy: &AuthorizationPolicy, identity: &AuthUser) -> ApiResult<()> {
        for guard in &self.guards {
            guard.check(policy, identity).await?;
        }
        Ok(())
    }
}
