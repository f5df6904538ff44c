//! Password hashing using bcrypt
//!
//! Provides salted one-way hashing and constant-time verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. In async contexts use the
//! `*_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use std::sync::Arc;

/// Password hashing service
///
/// Every digest embeds its own random salt and cost, so `verify` redoes the
/// exact computation that produced it.
#[derive(Clone)]
pub struct PasswordService {
    cost: u32,
    /// Digest of a throwaway password, verified against on login misses
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Create a hasher with the given bcrypt cost
    ///
    /// Hashes one throwaway password up front, so call this once at startup.
    pub fn new(cost: u32) -> Result<Self> {
        let dummy_hash = bcrypt::hash("chirp-dummy-password", cost)
            .map_err(|e| anyhow::anyhow!("Failed to initialize password hasher: {}", e))?;
        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// A malformed hash is an error, not a mismatch.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Spend the same work as a real verification and discard the result
    pub async fn verify_dummy_async(&self, password: String) -> Result<()> {
        Self::verify_async(password, self.dummy_hash.to_string()).await?;
        Ok(())
    }
}
