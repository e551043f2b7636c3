//! Shared fixtures for service tests.

use crate::cache::{InMemoryCacheStore, MarketplaceCache};
use chrono::Utc;
use mercato_config::CacheConfig;
use mercato_core::{Listing, ListingId, ProfileInfo, UserId, UserRecord};
use mercato_repository::InMemoryMarketplace;
use std::sync::Arc;

pub(crate) struct Fixture {
    pub backend: Arc<InMemoryMarketplace>,
    pub store: Arc<InMemoryCacheStore>,
    pub cache: Arc<MarketplaceCache>,
}

pub(crate) fn fixture() -> Fixture {
    let backend = Arc::new(InMemoryMarketplace::new());
    let store = Arc::new(InMemoryCacheStore::new());
    let config = CacheConfig {
        invalidation_page_depth: 2,
        page_sizes: vec![10, 20],
        ..CacheConfig::default()
    };
    let cache = Arc::new(MarketplaceCache::new(store.clone(), &config));
    Fixture { backend, store, cache }
}

pub(crate) fn user(username: &str) -> UserRecord {
    UserRecord {
        id: UserId::new(),
        username: username.to_string(),
        email: format!("{}@example.com", username.to_lowercase()),
        display_name: None,
        created_at: Utc::now(),
    }
}

pub(crate) fn profile(user_id: UserId) -> ProfileInfo {
    ProfileInfo {
        user_id,
        display_name: "Alice".to_string(),
        bio: None,
        avatar_url: None,
        location: Some("Porto".to_string()),
        phone: None,
        updated_at: Utc::now(),
    }
}

pub(crate) fn listing(owner_id: UserId, title: &str, listing_type: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: ListingId::new(),
        owner_id,
        title: title.to_string(),
        description: String::new(),
        listing_type: listing_type.to_string(),
        price_cents: 2_500,
        currency: "EUR".to_string(),
        location: None,
        coordinates: None,
        created_at: now,
        updated_at: now,
    }
}
