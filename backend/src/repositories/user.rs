//! User store: user records and the follow graph

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chirp_shared::types::UserProfile;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Free-form profile fields supplied at sign-up and merged on update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

impl ProfileFields {
    /// Shallow merge: fields present in `changes` replace ours, absent ones stay.
    pub fn merge(&mut self, changes: ProfileFields) {
        if let Some(first_name) = changes.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
    }
}

/// User record as held by the store
///
/// `followers` and `following` hold emails. If A is in B's `following`,
/// B is in A's `followers`; only [`UserStore::follow`] changes either list.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub profile: ProfileFields,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub sign_up_date: DateTime<Utc>,
}

impl UserRecord {
    /// Public view of the record, without the password hash
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.profile.first_name.clone(),
            last_name: self.profile.last_name.clone(),
            bio: self.profile.bio.clone(),
            followers: self.followers.clone(),
            following: self.following.clone(),
            sign_up_date: self.sign_up_date,
        }
    }
}

/// Port for user storage.
///
/// Every mutation is atomic with respect to every other mutation on the
/// same store, and reads never observe a half-applied mutation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user. Fails with `EmailTaken` if the email (as given, no
    /// normalization) is already registered.
    async fn sign_up(
        &self,
        email: &str,
        password_hash: String,
        profile: ProfileFields,
    ) -> ApiResult<UserRecord>;

    /// All users, in sign-up order
    async fn find_all(&self) -> ApiResult<Vec<UserRecord>>;

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<UserRecord>>;

    /// Number of registered users, without copying any record
    async fn count(&self) -> ApiResult<usize>;

    /// Merge profile fields into an existing user. `id` and `email` never change.
    async fn update(&self, id: Uuid, changes: ProfileFields) -> ApiResult<UserRecord>;

    /// Add the edge follower -> target on both records and return the target.
    async fn follow(&self, follower_email: &str, target_email: &str) -> ApiResult<UserRecord>;
}

/// Volatile user store living for the lifetime of its owner
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn sign_up(
        &self,
        email: &str,
        password_hash: String,
        profile: ProfileFields,
    ) -> ApiResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.iter().any(|user| user.email == email) {
            return Err(ApiError::EmailTaken);
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            profile,
            followers: Vec::new(),
            following: Vec::new(),
            sign_up_date: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_all(&self) -> ApiResult<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn count(&self) -> ApiResult<usize> {
        Ok(self.users.read().await.len())
    }

    async fn update(&self, id: Uuid, changes: ProfileFields) -> ApiResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|user| user.id == id).ok_or_else(|| {
            ApiError::NotFound(format!("Could not update user: No user found with id of {}", id))
        })?;

        user.profile.merge(changes);
        Ok(user.clone())
    }

    async fn follow(&self, follower_email: &str, target_email: &str) -> ApiResult<UserRecord> {
        if follower_email == target_email {
            return Err(ApiError::SelfFollow);
        }

        // Both sides change under one write guard
        let mut users = self.users.write().await;

        let target_idx = users
            .iter()
            .position(|user| user.email == target_email)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Could not follow user: No user found with email of {}",
                    target_email
                ))
            })?;
        let follower_idx = users
            .iter()
            .position(|user| user.email == follower_email)
            .ok_or_else(|| {
                ApiError::NotFound(format!("No user found with email of {}", follower_email))
            })?;

        let already_following = users[target_idx]
            .followers
            .iter()
            .any(|email| email == follower_email)
            || users[follower_idx]
                .following
                .iter()
                .any(|email| email == target_email);
        if already_following {
            return Err(ApiError::AlreadyFollowing(target_email.to_string()));
        }

        users[follower_idx].following.push(target_email.to_string());
        users[target_idx].followers.push(follower_email.to_string());

        Ok(users[target_idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::FirstName;
    use fake::Fake;
    use proptest::prelude::*;
    use std::sync::Arc;

    async fn store_with(emails: &[&str]) -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        for email in emails {
            store
                .sign_up(email, "hash".to_string(), ProfileFields::default())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_sign_up_starts_with_empty_relationships() {
        let store = InMemoryUserStore::new();
        let email: String = SafeEmail().fake();
        let user = store
            .sign_up(&email, "hash".to_string(), ProfileFields::default())
            .await
            .unwrap();

        assert_eq!(user.email, email);
        assert!(user.followers.is_empty());
        assert!(user.following.is_empty());

        let found = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(store.find_by_id(user.id).await.unwrap().unwrap().email, email);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = store_with(&["a@x.com"]).await;
        let result = store
            .sign_up("a@x.com", "other".to_string(), ProfileFields::default())
            .await;

        assert!(matches!(result, Err(ApiError::EmailTaken)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let store = store_with(&["a@x.com"]).await;
        let result = store
            .sign_up("A@x.com", "hash".to_string(), ProfileFields::default())
            .await;

        assert!(result.is_ok());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_all_preserves_sign_up_order() {
        let store = store_with(&["a@x.com", "b@x.com", "c@x.com"]).await;
        let emails: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|user| user.email)
            .collect();

        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn test_update_merges_only_present_fields() {
        let store = InMemoryUserStore::new();
        let first_name: String = FirstName().fake();
        let user = store
            .sign_up(
                "a@x.com",
                "hash".to_string(),
                ProfileFields {
                    first_name: Some(first_name.clone()),
                    last_name: Some("Lovelace".to_string()),
                    bio: None,
                },
            )
            .await
            .unwrap();

        let updated = store
            .update(
                user.id,
                ProfileFields {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.profile.first_name.as_deref(), Some(first_name.as_str()));
        assert_eq!(updated.profile.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(updated.profile.bio.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let store = InMemoryUserStore::new();
        let result = store.update(Uuid::new_v4(), ProfileFields::default()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_updates_both_sides() {
        let store = store_with(&["a@x.com", "b@x.com"]).await;

        let target = store.follow("a@x.com", "b@x.com").await.unwrap();
        assert_eq!(target.email, "b@x.com");
        assert_eq!(target.followers, vec!["a@x.com"]);

        let follower = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(follower.following, vec!["b@x.com"]);
        assert!(follower.followers.is_empty());
    }

    #[tokio::test]
    async fn test_follow_twice_rejected() {
        let store = store_with(&["a@x.com", "b@x.com"]).await;
        store.follow("a@x.com", "b@x.com").await.unwrap();

        let result = store.follow("a@x.com", "b@x.com").await;
        assert!(matches!(result, Err(ApiError::AlreadyFollowing(_))));

        let target = store.find_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(target.followers.len(), 1);
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let store = store_with(&["a@x.com"]).await;

        let result = store.follow("a@x.com", "a@x.com").await;
        assert!(matches!(result, Err(ApiError::SelfFollow)));

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert!(user.followers.is_empty());
        assert!(user.following.is_empty());
    }

    #[tokio::test]
    async fn test_follow_unknown_target() {
        let store = store_with(&["a@x.com"]).await;

        let result = store.follow("a@x.com", "ghost@x.com").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert!(user.following.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_follows_are_not_lost() {
        let emails: Vec<String> = (0..32).map(|i| format!("user{}@x.com", i)).collect();
        let store = Arc::new(InMemoryUserStore::new());
        store
            .sign_up("target@x.com", "hash".to_string(), ProfileFields::default())
            .await
            .unwrap();
        for email in &emails {
            store
                .sign_up(email, "hash".to_string(), ProfileFields::default())
                .await
                .unwrap();
        }

        let handles: Vec<_> = emails
            .iter()
            .cloned()
            .map(|email| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.follow(&email, "target@x.com").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let target = store.find_by_email("target@x.com").await.unwrap().unwrap();
        assert_eq!(target.followers.len(), emails.len());
        for email in &emails {
            assert!(target.followers.contains(email));
            let follower = store.find_by_email(email).await.unwrap().unwrap();
            assert_eq!(follower.following, vec!["target@x.com"]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_sign_ups_keep_one_record() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .sign_up("a@x.com", format!("hash{}", i), ProfileFields::default())
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, ApiError::EmailTaken)),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mutual_follows_both_land() {
        for _ in 0..20 {
            let store = Arc::new(store_with(&["a@x.com", "b@x.com"]).await);

            let forward = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.follow("a@x.com", "b@x.com").await })
            };
            let backward = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.follow("b@x.com", "a@x.com").await })
            };
            forward.await.unwrap().unwrap();
            backward.await.unwrap().unwrap();

            for (email, other) in [("a@x.com", "b@x.com"), ("b@x.com", "a@x.com")] {
                let user = store.find_by_email(email).await.unwrap().unwrap();
                assert_eq!(user.followers, vec![other]);
                assert_eq!(user.following, vec![other]);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Any sequence of follow attempts leaves the graph symmetric,
        /// free of self-edges and free of duplicate edges.
        #[test]
        fn prop_follow_graph_stays_symmetric(
            edges in prop::collection::vec((0usize..5, 0usize..5), 0..40)
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let emails: Vec<String> = (0..5).map(|i| format!("u{}@x.com", i)).collect();
                let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
                let store = store_with(&refs).await;

                for (from, to) in edges {
                    let _ = store.follow(&emails[from], &emails[to]).await;
                }

                let users = store.find_all().await.unwrap();
                for user in &users {
                    prop_assert!(!user.followers.contains(&user.email));
                    prop_assert!(!user.following.contains(&user.email));

                    let mut deduped = user.following.clone();
                    deduped.sort();
                    deduped.dedup();
                    prop_assert_eq!(deduped.len(), user.following.len());

                    for followed in &user.following {
                        let other = users.iter().find(|u| &u.email == followed).unwrap();
                        prop_assert!(other.followers.contains(&user.email));
                    }
                    for follower in &user.followers {
                        let other = users.iter().find(|u| &u.email == follower).unwrap();
                        prop_assert!(other.following.contains(&user.email));
                    }
                }
                Ok(())
            })?;
        }
    }
}
