//! User operations: sign-up, profile reads and updates, and the follow graph

use crate::auth::{AuthUser, AuthorizationPolicy, Guard, GuardChain, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{ProfileFields, UserRecord, UserStore};
use chirp_shared::types::{SignUpRequest, UpdateUserRequest, UserProfile};
use tracing::info;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Password hashing runs on the blocking pool and never under a store lock.
    pub async fn sign_up(
        users: &dyn UserStore,
        passwords: &PasswordService,
        req: SignUpRequest,
    ) -> ApiResult<UserProfile> {
        // Cheap early exit; the store re-checks atomically on insert
        if users.find_by_email(&req.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash = passwords.hash_async(req.password).await?;
        let profile = ProfileFields {
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
        };
        let user = users.sign_up(&req.email, password_hash, profile).await?;

        info!(user_id = %user.id, "User signed up");
        Ok(user.to_profile())
    }

    /// All users, in sign-up order
    pub async fn list_users(users: &dyn UserStore) -> ApiResult<Vec<UserProfile>> {
        Ok(users
            .find_all()
            .await?
            .iter()
            .map(UserRecord::to_profile)
            .collect())
    }

    pub async fn get_user(users: &dyn UserStore, id: Uuid) -> ApiResult<UserProfile> {
        Ok(Self::require_user(users, id).await?.to_profile())
    }

    /// Update a profile; only its owner may do so
    pub async fn update_user(
        users: &dyn UserStore,
        policy: &AuthorizationPolicy,
        identity: &AuthUser,
        target_id: Uuid,
        req: UpdateUserRequest,
    ) -> ApiResult<UserProfile> {
        GuardChain::new()
            .require(Guard::SelfProfile(target_id))
            .enforce(policy, identity)
            .await?;

        let changes = ProfileFields {
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
        };
        let user = users.update(target_id, changes).await?;

        info!(user_id = %user.id, "User profile updated");
        Ok(user.to_profile())
    }

    /// Follow the user with `target_email` as the acting identity
    ///
    /// Returns the target's updated profile.
    pub async fn follow_user(
        users: &dyn UserStore,
        identity: &AuthUser,
        target_email: &str,
    ) -> ApiResult<UserProfile> {
        let target = users.follow(&identity.email, target_email).await?;

        info!(user_id = %identity.user_id, target_id = %target.id, "User followed");
        Ok(target.to_profile())
    }

    /// Profiles of the users following `id`
    pub async fn followers_of(users: &dyn UserStore, id: Uuid) -> ApiResult<Vec<UserProfile>> {
        let user = Self::require_user(users, id).await?;
        Self::resolve_emails(users, &user.followers).await
    }

    /// Profiles of the users `id` follows
    pub async fn following_of(users: &dyn UserStore, id: Uuid) -> ApiResult<Vec<UserProfile>> {
        let user = Self::require_user(users, id).await?;
        Self::resolve_emails(users, &user.following).await
    }

    async fn require_user(users: &dyn UserStore, id: Uuid) -> ApiResult<UserRecord> {
        users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("No user found with id of {}", id)))
    }

    async fn resolve_emails(users: &dyn UserStore, emails: &[String]) -> ApiResult<Vec<UserProfile>> {
        let mut profiles = Vec::with_capacity(emails.len());
        for email in emails {
            if let Some(user) = users.find_by_email(email).await? {
                profiles.push(user.to_profile());
            }
        }
        Ok(profiles)
    }
}
