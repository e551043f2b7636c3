//! Application state for Axum handlers.

use mercato_core::ErrorTranslator;
use mercato_repository::{
    ContactRepository, FavoriteRepository, GeocodingProvider, ListingRepository, ProfileRepository,
    ProposalRepository, UserRepository,
};
use mercato_service::{
    ContactService, FavoriteService, GeocodingService, ListingService, MarketplaceCache, ProfileService,
    ProposalService, UserService,
};
use std::sync::Arc;

/// Default request header that forces a cache bypass.
pub const DEFAULT_BYPASS_HEADER: &str = "x-cache-bypass";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub profile_service: Arc<ProfileService>,
    pub listing_service: Arc<ListingService>,
    pub geocoding_service: Arc<GeocodingService>,
    pub proposal_service: Arc<ProposalService>,
    pub contact_service: Arc<ContactService>,
    pub favorite_service: Arc<FavoriteService>,
    pub cache: Arc<MarketplaceCache>,
    pub translator: Arc<ErrorTranslator>,
    pub bypass_header: Arc<str>,
}

impl AppState {
    /// Wires every service over one backend that serves all repositories.
    pub fn new<B>(backend: Arc<B>, cache: Arc<MarketplaceCache>, translator: ErrorTranslator) -> Self
    where
        B: UserRepository
            + ProfileRepository
            + ListingRepository
            + GeocodingProvider
            + ProposalRepository
            + ContactRepository
            + FavoriteRepository
            + 'static,
    {
        Self {
            user_service: Arc::new(UserService::new(backend.clone(), cache.clone())),
            profile_service: Arc::new(ProfileService::new(backend.clone(), cache.clone())),
            listing_service: Arc::new(ListingService::new(backend.clone(), cache.clone())),
            geocoding_service: Arc::new(GeocodingService::new(backend.clone(), cache.clone())),
            proposal_service: Arc::new(ProposalService::new(backend.clone(), backend.clone(), cache.clone())),
            contact_service: Arc::new(ContactService::new(backend.clone(), cache.clone())),
            favorite_service: Arc::new(FavoriteService::new(backend, cache.clone())),
            cache,
            translator: Arc::new(translator),
            bypass_header: Arc::from(DEFAULT_BYPASS_HEADER),
        }
    }

    /// Sets the header that forces a cache bypass.
    #[must_use]
    pub fn with_bypass_header(mut self, header: &str) -> Self {
        self.bypass_header = Arc::from(header.to_ascii_lowercase());
        self
    }
}
