//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! The stores inside live exactly as long as the state does; for the server
//! binary that is the process lifetime.

use crate::auth::{AuthorizationPolicy, JwtService, PasswordService};
use crate::config::AppConfig;
use crate::repositories::{InMemoryPostStore, InMemoryUserStore, PostStore, UserStore};
use anyhow::Result;
use std::sync::Arc;

/// Shared application state
///
/// Every field is an `Arc` or Arc-backed, so cloning is O(1).
#[derive(Clone)]
pub struct AppState {
    /// User records and the follow graph
    pub users: Arc<dyn UserStore>,
    /// Post records
    pub posts: Arc<dyn PostStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Password hasher at the configured cost
    pub passwords: PasswordService,
}

impl AppState {
    /// Create state over the given stores
    ///
    /// Derives the JWT keys and warms the password hasher, so call this
    /// once at startup.
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        config: AppConfig,
    ) -> Result<Self> {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry_secs);
        let passwords = PasswordService::new(config.password.bcrypt_cost)?;

        Ok(Self {
            users,
            posts,
            config: Arc::new(config),
            jwt,
            passwords,
        })
    }

    /// Create state backed by fresh, empty in-memory stores
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryPostStore::new()),
            config,
        )
    }

    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    #[inline]
    pub fn posts(&self) -> &dyn PostStore {
        self.posts.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    /// Authorization policy over the current post store
    pub fn policy(&self) -> AuthorizationPolicy {
        AuthorizationPolicy::new(Arc::clone(&self.posts))
    }
}
