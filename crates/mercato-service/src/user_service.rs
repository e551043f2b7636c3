//! User lookups.

use crate::cache::MarketplaceCache;
use mercato_core::{MercatoError, MercatoResult, UserId, UserRecord, UsernameLookup};
use mercato_repository::UserRepository;
use std::sync::Arc;
use tracing::debug;

/// Cached user and username lookups.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cache: Arc<MarketplaceCache>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<MarketplaceCache>) -> Self {
        Self { users, cache }
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: UserId, bypass: bool) -> MercatoResult<UserRecord> {
        debug!("Getting user: {}", id);

        self.cache
            .users
            .get_or_load(&id, bypass, || async move {
                self.users
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| MercatoError::not_found("User", id))
            })
            .await
    }

    /// Resolves a username to its account ID. Usernames are case-insensitive.
    pub async fn resolve_username(&self, username: &str, bypass: bool) -> MercatoResult<UsernameLookup> {
        let username = username.trim();
        if username.is_empty() {
            return Err(MercatoError::invalid_field("username", "Username is required"));
        }
        debug!("Resolving username: {}", username);

        if let Some(cached) = self.cache.usernames.read(username, bypass).await {
            return Ok(cached);
        }

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| MercatoError::not_found("User", username))?;

        let lookup = UsernameLookup::from(&user);
        if !bypass {
            self.cache.usernames.populate(username, &lookup).await;
            // Also cache by ID for the follow-up lookup.
            self.cache.users.populate(&user.id, &user).await;
        }

        Ok(lookup)
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, user};

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let fx = fixture();
        let alice = user("Alice");
        fx.backend.insert_user(alice.clone());
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());

        let first = service.get_user(alice.id, false).await.unwrap();
        let second = service.get_user(alice.id, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fx.backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_bypass_reads_backend() {
        let fx = fixture();
        let alice = user("Alice");
        fx.backend.insert_user(alice.clone());
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());

        service.get_user(alice.id, false).await.unwrap();
        service.get_user(alice.id, true).await.unwrap();

        assert_eq!(fx.backend.read_count(), 2);
    }

    #[tokio::test]
    async fn test_bypassed_reads_do_not_write_cache() {
        let fx = fixture();
        let alice = user("Alice");
        fx.backend.insert_user(alice.clone());
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());

        service.get_user(alice.id, true).await.unwrap();
        assert!(fx.store.is_empty());

        service.resolve_username("alice", true).await.unwrap();
        assert!(fx.store.is_empty());

        service.get_user(alice.id, false).await.unwrap();
        assert_eq!(fx.store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_cached() {
        let fx = fixture();
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());
        let id = UserId::new();

        assert!(matches!(
            service.get_user(id, false).await,
            Err(MercatoError::NotFound { .. })
        ));
        assert!(fx.store.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_username_warms_both_keys() {
        let fx = fixture();
        let alice = user("Alice");
        fx.backend.insert_user(alice.clone());
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());

        let lookup = service.resolve_username("ALICE", false).await.unwrap();
        assert_eq!(lookup.user_id, alice.id);

        service.resolve_username("alice", false).await.unwrap();
        service.get_user(alice.id, false).await.unwrap();
        assert_eq!(fx.backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_username_is_rejected() {
        let fx = fixture();
        let service = UserService::new(fx.backend.clone(), fx.cache.clone());

        match service.resolve_username("  ", false).await {
            Err(MercatoError::Validation(violations)) => assert_eq!(violations[0].field, "username"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
