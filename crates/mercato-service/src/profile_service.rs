//! Profile information.

use crate::cache::MarketplaceCache;
use crate::dto::UpdateProfileRequest;
use crate::failure::or_domain_failure;
use mercato_core::{DomainFailure, MercatoError, MercatoResult, ProfileInfo, UserId, ValidateExt};
use mercato_repository::ProfileRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Cached profile reads and profile updates.
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    cache: Arc<MarketplaceCache>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(profiles: Arc<dyn ProfileRepository>, cache: Arc<MarketplaceCache>) -> Self {
        Self { profiles, cache }
    }

    /// Gets the profile of a user.
    pub async fn get_profile(&self, user_id: UserId, bypass: bool) -> MercatoResult<ProfileInfo> {
        debug!("Getting profile: {}", user_id);

        self.cache
            .profiles
            .get_or_load(&user_id, bypass, || async move {
                self.profiles
                    .find_profile(user_id)
                    .await?
                    .ok_or_else(|| MercatoError::not_found("Profile", user_id))
            })
            .await
    }

    /// Updates a profile and drops the cached copy.
    pub async fn update_profile(&self, user_id: UserId, request: UpdateProfileRequest) -> MercatoResult<ProfileInfo> {
        debug!("Updating profile: {}", user_id);

        request.validate_request()?;

        let updated = self
            .profiles
            .update_profile(user_id, request.into())
            .await
            .map_err(|e| or_domain_failure(e, DomainFailure::UpdateProfileFailed))?;

        self.cache.profiles.invalidate(&user_id).await;

        info!("Profile updated: {}", user_id);
        Ok(updated)
    }
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, profile};

    #[tokio::test]
    async fn test_update_invalidates_cached_profile() {
        let fx = fixture();
        let user_id = UserId::new();
        fx.backend.insert_profile(profile(user_id));
        let service = ProfileService::new(fx.backend.clone(), fx.cache.clone());

        service.get_profile(user_id, false).await.unwrap();
        let request = UpdateProfileRequest {
            bio: Some("Vintage furniture".to_string()),
            ..UpdateProfileRequest::default()
        };
        service.update_profile(user_id, request).await.unwrap();

        let fresh = service.get_profile(user_id, false).await.unwrap();
        assert_eq!(fresh.bio.as_deref(), Some("Vintage furniture"));
        assert_eq!(fx.backend.read_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_backend() {
        let fx = fixture();
        let user_id = UserId::new();
        fx.backend.insert_profile(profile(user_id));
        let service = ProfileService::new(fx.backend.clone(), fx.cache.clone());

        let request = UpdateProfileRequest {
            avatar_url: Some("not a url".to_string()),
            ..UpdateProfileRequest::default()
        };

        match service.update_profile(user_id, request).await {
            Err(MercatoError::Validation(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "avatar_url");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_as_update_failure() {
        let fx = fixture();
        let user_id = UserId::new();
        fx.backend.insert_profile(profile(user_id));
        fx.backend.set_fail_writes(true);
        let service = ProfileService::new(fx.backend.clone(), fx.cache.clone());

        let err = service
            .update_profile(user_id, UpdateProfileRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MercatoError::Domain(DomainFailure::UpdateProfileFailed)));
        assert_eq!(err.status_code(), 500);
    }
}
