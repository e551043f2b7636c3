//! Favorite listings.

use crate::cache::MarketplaceCache;
use crate::dto::AddFavoriteRequest;
use mercato_core::{Favorite, ListingId, MercatoError, MercatoResult, UserId};
use mercato_repository::FavoriteRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Cached favorite lists.
pub struct FavoriteService {
    favorites: Arc<dyn FavoriteRepository>,
    cache: Arc<MarketplaceCache>,
}

impl FavoriteService {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, cache: Arc<MarketplaceCache>) -> Self {
        Self { favorites, cache }
    }

    /// Lists a user's favorites.
    pub async fn list_favorites(&self, user_id: UserId, bypass: bool) -> MercatoResult<Vec<Favorite>> {
        debug!("Listing favorites of {}", user_id);

        self.cache
            .favorites
            .get_or_load(&user_id, bypass, || self.favorites.list_favorites(user_id))
            .await
    }

    /// Bookmarks a listing. Bookmarking twice is harmless.
    pub async fn add_favorite(&self, user_id: UserId, request: AddFavoriteRequest) -> MercatoResult<Favorite> {
        let favorite = self.favorites.add_favorite(user_id, request.listing_id).await?;
        self.cache.favorites.invalidate(&user_id).await;

        info!("Listing {} favorited by {}", request.listing_id, user_id);
        Ok(favorite)
    }

    /// Removes a bookmark.
    pub async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> MercatoResult<()> {
        let removed = self.favorites.remove_favorite(user_id, listing_id).await?;
        if !removed {
            return Err(MercatoError::not_found("Favorite", listing_id));
        }
        self.cache.favorites.invalidate(&user_id).await;

        info!("Listing {} unfavorited by {}", listing_id, user_id);
        Ok(())
    }
}

impl std::fmt::Debug for FavoriteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, listing};

    #[tokio::test]
    async fn test_add_and_remove_keep_list_fresh() {
        let fx = fixture();
        let lamp = listing(UserId::new(), "Lamp", "sale");
        fx.backend.insert_listing(lamp.clone());
        let service = FavoriteService::new(fx.backend.clone(), fx.cache.clone());
        let user_id = UserId::new();

        assert!(service.list_favorites(user_id, false).await.unwrap().is_empty());

        let request = AddFavoriteRequest { listing_id: lamp.id };
        service.add_favorite(user_id, request.clone()).await.unwrap();
        service.add_favorite(user_id, request).await.unwrap();
        assert_eq!(service.list_favorites(user_id, false).await.unwrap().len(), 1);

        service.remove_favorite(user_id, lamp.id).await.unwrap();
        assert!(service.list_favorites(user_id, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removing_unknown_favorite() {
        let fx = fixture();
        let service = FavoriteService::new(fx.backend.clone(), fx.cache.clone());

        let err = service
            .remove_favorite(UserId::new(), ListingId::new())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
    }
}
