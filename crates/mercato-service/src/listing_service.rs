//! Listings: filtered search, detail, owner pages and updates.

use crate::cache::MarketplaceCache;
use crate::dto::UpdateListingRequest;
use mercato_core::{
    Listing, ListingId, ListingQuery, MercatoError, MercatoResult, Page, PageRequest, UserId, ValidateExt,
};
use mercato_repository::ListingRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Cached listing reads and listing updates.
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    cache: Arc<MarketplaceCache>,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(listings: Arc<dyn ListingRepository>, cache: Arc<MarketplaceCache>) -> Self {
        Self { listings, cache }
    }

    /// Returns one page of the filtered listing search.
    pub async fn list_listings(&self, query: ListingQuery, bypass: bool) -> MercatoResult<Page<Listing>> {
        PageRequest::validated(query.page.page, query.page.limit)?;
        debug!(
            "Listing page {} (limit {}), type: {:?}, search: {:?}",
            query.page.page, query.page.limit, query.listing_type, query.search
        );

        self.cache
            .listing_pages
            .get_or_load(&query, bypass, || self.listings.find_page(&query))
            .await
    }

    /// Gets a listing by ID.
    pub async fn get_listing(&self, id: ListingId, bypass: bool) -> MercatoResult<Listing> {
        debug!("Getting listing: {}", id);

        self.cache
            .listings
            .get_or_load(&id, bypass, || async move {
                self.listings
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| MercatoError::not_found("Listing", id))
            })
            .await
    }

    /// Returns one page of a user's listings.
    pub async fn list_owner_listings(
        &self,
        owner_id: UserId,
        page: PageRequest,
        bypass: bool,
    ) -> MercatoResult<Page<Listing>> {
        let page = PageRequest::validated(page.page, page.limit)?;
        debug!("Listing page {} of owner {}", page.page, owner_id);

        self.cache
            .owner_listings
            .get_or_load(&(owner_id, page), bypass, || {
                self.listings.find_by_owner(owner_id, page)
            })
            .await
    }

    /// Updates a listing and drops every cached view it can appear in.
    pub async fn update_listing(&self, id: ListingId, request: UpdateListingRequest) -> MercatoResult<Listing> {
        debug!("Updating listing: {}", id);

        request.validate_request()?;

        let previous = self
            .listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| MercatoError::not_found("Listing", id))?;

        let updated = self.listings.update(id, request.into()).await?;

        self.cache
            .invalidate_listing(&updated, Some(previous.listing_type.as_str()))
            .await;

        info!("Listing updated: {}", id);
        Ok(updated)
    }
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, listing};
    use mercato_core::Filter;

    fn query(page: u32, limit: u32, listing_type: Option<&str>) -> ListingQuery {
        ListingQuery {
            page: PageRequest::new(page, limit),
            listing_type: Filter::from_optional(listing_type.map(ToString::to_string)),
            search: Filter::Any,
        }
    }

    #[tokio::test]
    async fn test_pages_are_cached_per_filter() {
        let fx = fixture();
        let owner = UserId::new();
        fx.backend.insert_listing(listing(owner, "Kayak", "rental"));
        fx.backend.insert_listing(listing(owner, "Tent", "sale"));
        let service = ListingService::new(fx.backend.clone(), fx.cache.clone());

        let rentals = service.list_listings(query(1, 10, Some("rental")), false).await.unwrap();
        let all = service.list_listings(query(1, 10, None), false).await.unwrap();
        service.list_listings(query(1, 10, Some("rental")), false).await.unwrap();
        service.list_listings(query(1, 10, Some("")), false).await.unwrap();

        assert_eq!(rentals.total, 1);
        assert_eq!(all.total, 2);
        assert_eq!(fx.backend.read_count(), 2);
    }

    #[tokio::test]
    async fn test_page_bounds_are_validated() {
        let fx = fixture();
        let service = ListingService::new(fx.backend.clone(), fx.cache.clone());

        let err = service.list_listings(query(0, 10, None), false).await.unwrap_err();

        assert!(matches!(err, MercatoError::Validation(_)));
        assert_eq!(fx.backend.read_count(), 0);
    }

    #[tokio::test]
    async fn test_update_refreshes_every_view() {
        let fx = fixture();
        let owner = UserId::new();
        let kayak = listing(owner, "Kayak", "rental");
        fx.backend.insert_listing(kayak.clone());
        let service = ListingService::new(fx.backend.clone(), fx.cache.clone());

        service.get_listing(kayak.id, false).await.unwrap();
        service.list_listings(query(1, 10, Some("rental")), false).await.unwrap();
        service
            .list_owner_listings(owner, PageRequest::new(1, 20), false)
            .await
            .unwrap();

        let request = UpdateListingRequest {
            listing_type: Some("sale".to_string()),
            ..UpdateListingRequest::default()
        };
        service.update_listing(kayak.id, request).await.unwrap();

        let detail = service.get_listing(kayak.id, false).await.unwrap();
        let rentals = service.list_listings(query(1, 10, Some("rental")), false).await.unwrap();
        let sales = service.list_listings(query(1, 10, Some("sale")), false).await.unwrap();
        let owned = service
            .list_owner_listings(owner, PageRequest::new(1, 20), false)
            .await
            .unwrap();

        assert_eq!(detail.listing_type, "sale");
        assert_eq!(rentals.total, 0);
        assert_eq!(sales.total, 1);
        assert_eq!(owned.items[0].listing_type, "sale");
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let fx = fixture();
        let owner = UserId::new();
        let kayak = listing(owner, "Kayak", "rental");
        fx.backend.insert_listing(kayak.clone());
        let service = ListingService::new(fx.backend.clone(), fx.cache.clone());

        let request = UpdateListingRequest {
            title: Some("   ".to_string()),
            ..UpdateListingRequest::default()
        };

        match service.update_listing(kayak.id, request).await {
            Err(MercatoError::Validation(violations)) => assert_eq!(violations[0].field, "title"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_listing() {
        let fx = fixture();
        let service = ListingService::new(fx.backend.clone(), fx.cache.clone());

        let err = service.get_listing(ListingId::new(), false).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
