//! Per-domain cache helpers.
//!
//! Each cached domain is a marker type implementing [`CacheDomain`]. A
//! [`DomainCache`] wraps the generic helper with that domain's key derivation,
//! TTL, bypass handling and read accounting. [`MarketplaceCache`] bundles one
//! helper per domain together with the invalidation rules for mutations.

use super::{cache_keys, CacheAside, CacheKey, CacheMetrics, CacheStore, ReadOutcome};
use futures::future::join_all;
use mercato_config::CacheConfig;
use mercato_core::{
    Contact, Coordinates, Favorite, Filter, GeocodeQuery, GeocodeResult, Listing, ListingId, ListingQuery,
    MercatoResult, Page, PageRequest, ProfileInfo, Proposal, ProposalId, ProposalQuery, ProposalStatus,
    UserId, UserRecord, UsernameLookup,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A cached domain: how to key it, what it stores, how long it lives.
pub trait CacheDomain: Send + Sync + 'static {
    /// Domain name used in logs, metrics and TTL overrides.
    const NAME: &'static str;

    /// Natural TTL of the domain. `None` falls back to the configured default.
    const TTL: Option<Duration> = None;

    /// The natural key callers use.
    type Key: ?Sized + Sync;

    /// The cached value.
    type Value: Serialize + DeserializeOwned + Send + Sync;

    /// Derives the cache key.
    fn key(natural: &Self::Key) -> CacheKey;
}

macro_rules! cache_domain {
    ($(#[$doc:meta])* $name:ident, $label:literal, $key:ty, $value:ty, $ttl:expr, $derive:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl CacheDomain for $name {
            const NAME: &'static str = $label;
            const TTL: Option<Duration> = $ttl;
            type Key = $key;
            type Value = $value;

            fn key(natural: &Self::Key) -> CacheKey {
                $derive(natural)
            }
        }
    };
}

const FIVE_MINUTES: Option<Duration> = Some(Duration::from_secs(300));
const ONE_DAY: Option<Duration> = Some(Duration::from_secs(86_400));

fn user_key(id: &UserId) -> CacheKey {
    cache_keys::user_by_id(*id)
}
fn profile_key(id: &UserId) -> CacheKey {
    cache_keys::profile(*id)
}
fn listing_key(id: &ListingId) -> CacheKey {
    cache_keys::listing(*id)
}
fn owner_listings_key(key: &(UserId, PageRequest)) -> CacheKey {
    cache_keys::listings_by_owner(key.0, key.1)
}
fn geocode_reverse_key(coordinates: &Coordinates) -> CacheKey {
    cache_keys::geocode_reverse(*coordinates)
}
fn proposal_key(id: &ProposalId) -> CacheKey {
    cache_keys::proposal(*id)
}
fn contacts_key(id: &UserId) -> CacheKey {
    cache_keys::contacts(*id)
}
fn favorites_key(id: &UserId) -> CacheKey {
    cache_keys::favorites(*id)
}

cache_domain!(
    /// User records by ID.
    UserDomain, "user", UserId, UserRecord, None, user_key
);
cache_domain!(
    /// Username to account resolution.
    UsernameDomain, "username", str, UsernameLookup, None, cache_keys::user_by_username
);
cache_domain!(
    /// Public profile information.
    ProfileDomain, "profile", UserId, ProfileInfo, None, profile_key
);
cache_domain!(
    /// Listing detail.
    ListingDomain, "listing", ListingId, Listing, None, listing_key
);
cache_domain!(
    /// Pages of the filtered listing search.
    ListingPageDomain, "listing_page", ListingQuery, Page<Listing>, FIVE_MINUTES, cache_keys::listing_page
);
cache_domain!(
    /// Pages of one owner's listings.
    OwnerListingsDomain, "owner_listings", (UserId, PageRequest), Page<Listing>, FIVE_MINUTES, owner_listings_key
);
cache_domain!(
    /// Forward geocoding results.
    GeocodeSearchDomain, "geocode_search", GeocodeQuery, Vec<GeocodeResult>, ONE_DAY, cache_keys::geocode_search
);
cache_domain!(
    /// Reverse geocoding results.
    GeocodeReverseDomain, "geocode_reverse", Coordinates, GeocodeResult, ONE_DAY, geocode_reverse_key
);
cache_domain!(
    /// Proposal detail.
    ProposalDomain, "proposal", ProposalId, Proposal, None, proposal_key
);
cache_domain!(
    /// Pages of proposals on a listing.
    ProposalPageDomain, "proposal_page", ProposalQuery, Page<Proposal>, FIVE_MINUTES, cache_keys::proposals_for_listing
);
cache_domain!(
    /// Contact lists.
    ContactsDomain, "contacts", UserId, Vec<Contact>, None, contacts_key
);
cache_domain!(
    /// Favorite lists.
    FavoritesDomain, "favorites", UserId, Vec<Favorite>, None, favorites_key
);

/// Cache helper bound to one domain. Never returns an error.
pub struct DomainCache<D: CacheDomain> {
    aside: CacheAside,
    ttl: Duration,
    _domain: PhantomData<fn() -> D>,
}

impl<D: CacheDomain> Clone for DomainCache<D> {
    fn clone(&self) -> Self {
        Self {
            aside: self.aside.clone(),
            ttl: self.ttl,
            _domain: PhantomData,
        }
    }
}

impl<D: CacheDomain> DomainCache<D> {
    /// Creates a helper. TTL precedence: config override, domain TTL, config default.
    #[must_use]
    pub fn new(aside: CacheAside, config: &CacheConfig) -> Self {
        let ttl = config
            .ttl_override(D::NAME)
            .or(D::TTL)
            .unwrap_or_else(|| aside.default_ttl());
        Self {
            aside,
            ttl,
            _domain: PhantomData,
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Derives the key for a natural key.
    #[must_use]
    pub fn key(&self, natural: &D::Key) -> CacheKey {
        D::key(natural)
    }

    /// Reads a cached value. With `bypass` set the store is not touched.
    pub async fn read(&self, natural: &D::Key, bypass: bool) -> Option<D::Value> {
        if bypass {
            debug!(domain = D::NAME, "Cache bypass requested");
            CacheMetrics::read(D::NAME, ReadOutcome::Bypass);
            return None;
        }

        let key = D::key(natural);
        let value = self.aside.get_from_cache::<D::Value>(&key).await;
        let outcome = if value.is_some() {
            ReadOutcome::Hit
        } else {
            ReadOutcome::Miss
        };
        debug!(domain = D::NAME, key = %key, outcome = outcome.as_str(), "Cache read");
        CacheMetrics::read(D::NAME, outcome);
        value
    }

    /// Stores a value under the domain TTL.
    pub async fn populate(&self, natural: &D::Key, value: &D::Value) {
        let key = D::key(natural);
        if self.aside.set_cache_with_ttl(&key, value, self.ttl).await {
            CacheMetrics::write(D::NAME);
        }
    }

    /// Removes the cached value, if any.
    pub async fn invalidate(&self, natural: &D::Key) {
        self.invalidate_key(&D::key(natural)).await;
    }

    async fn invalidate_key(&self, key: &CacheKey) {
        self.aside.invalidate_cache(key).await;
        CacheMetrics::invalidated(D::NAME, 1);
    }

    /// Removes a set of already derived keys concurrently.
    pub async fn invalidate_keys(&self, keys: &BTreeSet<CacheKey>) {
        join_all(keys.iter().map(|key| self.aside.invalidate_cache(key))).await;
        CacheMetrics::invalidated(D::NAME, keys.len() as u64);
        debug!(domain = D::NAME, count = keys.len(), "Invalidated cache keys");
    }

    /// Cache-aside read: returns the cached value, or loads, populates and
    /// returns it. A bypassed call neither reads nor writes the cache.
    pub async fn get_or_load<F, Fut>(&self, natural: &D::Key, bypass: bool, load: F) -> MercatoResult<D::Value>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = MercatoResult<D::Value>> + Send,
    {
        if let Some(cached) = self.read(natural, bypass).await {
            return Ok(cached);
        }

        let value = load().await?;
        if !bypass {
            self.populate(natural, &value).await;
        }
        Ok(value)
    }
}

impl<D: CacheDomain> std::fmt::Debug for DomainCache<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainCache")
            .field("domain", &D::NAME)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Every domain helper, plus the invalidation rules that span domains.
///
/// Built once per process and shared through application state.
#[derive(Debug, Clone)]
pub struct MarketplaceCache {
    pub users: DomainCache<UserDomain>,
    pub usernames: DomainCache<UsernameDomain>,
    pub profiles: DomainCache<ProfileDomain>,
    pub listings: DomainCache<ListingDomain>,
    pub listing_pages: DomainCache<ListingPageDomain>,
    pub owner_listings: DomainCache<OwnerListingsDomain>,
    pub geocode_search: DomainCache<GeocodeSearchDomain>,
    pub geocode_reverse: DomainCache<GeocodeReverseDomain>,
    pub proposals: DomainCache<ProposalDomain>,
    pub proposal_pages: DomainCache<ProposalPageDomain>,
    pub contacts: DomainCache<ContactsDomain>,
    pub favorites: DomainCache<FavoritesDomain>,
    page_depth: u32,
    page_sizes: Vec<u32>,
}

impl MarketplaceCache {
    /// Builds every helper over one store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        let aside = CacheAside::new(store)
            .with_default_ttl(config.default_ttl())
            .with_operation_timeout(config.operation_timeout());

        Self {
            users: DomainCache::new(aside.clone(), config),
            usernames: DomainCache::new(aside.clone(), config),
            profiles: DomainCache::new(aside.clone(), config),
            listings: DomainCache::new(aside.clone(), config),
            listing_pages: DomainCache::new(aside.clone(), config),
            owner_listings: DomainCache::new(aside.clone(), config),
            geocode_search: DomainCache::new(aside.clone(), config),
            geocode_reverse: DomainCache::new(aside.clone(), config),
            proposals: DomainCache::new(aside.clone(), config),
            proposal_pages: DomainCache::new(aside.clone(), config),
            contacts: DomainCache::new(aside.clone(), config),
            favorites: DomainCache::new(aside, config),
            page_depth: config.invalidation_page_depth,
            page_sizes: config.page_sizes.clone(),
        }
    }

    /// Whether the underlying store holds anything at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.users.aside.store().is_enabled()
    }

    /// Every page request the list invalidation covers.
    fn tracked_pages(&self) -> impl Iterator<Item = PageRequest> + '_ {
        (1..=self.page_depth).flat_map(move |page| {
            self.page_sizes
                .iter()
                .map(move |limit| PageRequest::new(page, *limit))
        })
    }

    /// Listing page keys a listing can appear under, for each of its types.
    ///
    /// Only unfiltered searches are enumerated; searched pages expire by TTL.
    #[must_use]
    pub fn listing_page_keys(&self, listing_types: &[&str]) -> BTreeSet<CacheKey> {
        let mut type_filters = vec![Filter::Any];
        type_filters.extend(listing_types.iter().map(|t| Filter::Exact((*t).to_string())));

        self.tracked_pages()
            .flat_map(|page| {
                type_filters.iter().map(move |listing_type| {
                    cache_keys::listing_page(&ListingQuery {
                        page,
                        listing_type: listing_type.clone(),
                        search: Filter::Any,
                    })
                })
            })
            .collect()
    }

    /// Owner listing page keys for one owner.
    #[must_use]
    pub fn owner_listing_keys(&self, owner_id: UserId) -> BTreeSet<CacheKey> {
        self.tracked_pages()
            .map(|page| cache_keys::listings_by_owner(owner_id, page))
            .collect()
    }

    /// Proposal page keys for a listing, for each of the given statuses.
    #[must_use]
    pub fn proposal_page_keys(&self, listing_id: ListingId, statuses: &[ProposalStatus]) -> BTreeSet<CacheKey> {
        let mut status_filters = vec![Filter::Any];
        status_filters.extend(statuses.iter().copied().map(Filter::Exact));

        self.tracked_pages()
            .flat_map(|page| {
                status_filters.iter().map(move |status| {
                    cache_keys::proposals_for_listing(&ProposalQuery {
                        listing_id,
                        status: status.clone(),
                        page,
                    })
                })
            })
            .collect()
    }

    /// Drops everything a listing mutation can affect.
    ///
    /// `previous_type` is the listing type before the change, when it changed.
    pub async fn invalidate_listing(&self, listing: &Listing, previous_type: Option<&str>) {
        let mut types = vec![listing.listing_type.as_str()];
        types.extend(previous_type.filter(|t| *t != listing.listing_type));

        self.listings.invalidate(&listing.id).await;
        self.listing_pages
            .invalidate_keys(&self.listing_page_keys(&types))
            .await;
        self.owner_listings
            .invalidate_keys(&self.owner_listing_keys(listing.owner_id))
            .await;
    }

    /// Drops everything a proposal mutation can affect.
    ///
    /// `previous_status` is the status before the change, if any.
    pub async fn invalidate_proposal(&self, proposal: &Proposal, previous_status: Option<ProposalStatus>) {
        let mut statuses = vec![proposal.status];
        statuses.extend(previous_status.filter(|s| *s != proposal.status));

        self.proposals.invalidate(&proposal.id).await;
        self.proposal_pages
            .invalidate_keys(&self.proposal_page_keys(proposal.listing_id, &statuses))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheStore;
    use chrono::Utc;

    fn config() -> CacheConfig {
        CacheConfig {
            invalidation_page_depth: 2,
            page_sizes: vec![10, 20],
            ..CacheConfig::default()
        }
    }

    fn user() -> UserRecord {
        UserRecord {
            id: UserId::new(),
            username: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    fn listing(listing_type: &str) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId::new(),
            owner_id: UserId::new(),
            title: "Desk".to_string(),
            description: "Oak desk".to_string(),
            listing_type: listing_type.to_string(),
            price_cents: 5_000,
            currency: "EUR".to_string(),
            location: None,
            coordinates: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn cache() -> (Arc<InMemoryCacheStore>, MarketplaceCache) {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = MarketplaceCache::new(store.clone(), &config());
        (store, cache)
    }

    #[tokio::test]
    async fn test_read_populate_invalidate() {
        let (_, cache) = cache();
        let user = user();

        assert!(cache.users.read(&user.id, false).await.is_none());
        cache.users.populate(&user.id, &user).await;
        assert_eq!(cache.users.read(&user.id, false).await, Some(user.clone()));

        cache.users.invalidate(&user.id).await;
        assert!(cache.users.read(&user.id, false).await.is_none());
    }

    #[tokio::test]
    async fn test_bypass_never_returns_cached_value() {
        let (_, cache) = cache();
        let user = user();
        cache.users.populate(&user.id, &user).await;

        assert!(cache.users.read(&user.id, true).await.is_none());
        assert!(cache.users.read(&user.id, false).await.is_some());
    }

    #[tokio::test]
    async fn test_bypass_does_not_touch_store() {
        let mut store = crate::cache::MockCacheStore::new();
        store.expect_get().never();
        let cache = MarketplaceCache::new(Arc::new(store), &config());

        assert!(cache.profiles.read(&UserId::new(), true).await.is_none());
    }

    #[tokio::test]
    async fn test_bypassed_load_leaves_store_untouched() {
        let (store, cache) = cache();
        let user = user();

        let loaded = cache
            .users
            .get_or_load(&user.id, true, || async { Ok(user.clone()) })
            .await
            .unwrap();

        assert_eq!(loaded.id, user.id);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_load_populates_once() {
        let (_, cache) = cache();
        let user = user();
        let loads = std::sync::atomic::AtomicU32::new(0);

        for _ in 0..3 {
            let loaded = cache
                .users
                .get_or_load(&user.id, false, || async {
                    loads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok(user.clone())
                })
                .await
                .unwrap();
            assert_eq!(loaded.id, user.id);
        }

        assert_eq!(loads.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_username_keys_ignore_case() {
        let (_, cache) = cache();
        let user = user();
        cache.usernames.populate("ALICE", &UsernameLookup::from(&user)).await;

        let found = cache.usernames.read("alice", false).await;
        assert_eq!(found.map(|l| l.user_id), Some(user.id));

        cache.usernames.invalidate("Alice").await;
        assert!(cache.usernames.read("alice", false).await.is_none());
    }

    #[test]
    fn test_reports_store_state() {
        let enabled = MarketplaceCache::new(Arc::new(InMemoryCacheStore::new()), &config());
        assert!(enabled.is_enabled());

        let disabled = MarketplaceCache::new(Arc::new(crate::cache::RedisCacheStore::disabled()), &config());
        assert!(!disabled.is_enabled());
    }

    #[test]
    fn test_ttl_precedence() {
        let mut config = config();
        config.ttl_overrides.insert("geocode_search".to_string(), 42);
        let cache = MarketplaceCache::new(Arc::new(InMemoryCacheStore::new()), &config);

        assert_eq!(cache.geocode_search.ttl(), Duration::from_secs(42));
        assert_eq!(cache.geocode_reverse.ttl(), Duration::from_secs(86_400));
        assert_eq!(cache.users.ttl(), config.default_ttl());
    }

    #[test]
    fn test_listing_page_enumeration() {
        let (_, cache) = cache();
        // 2 pages x 2 sizes x (any + sale + rental)
        assert_eq!(cache.listing_page_keys(&["sale", "rental"]).len(), 12);
        assert_eq!(cache.owner_listing_keys(UserId::new()).len(), 4);
    }

    #[tokio::test]
    async fn test_listing_mutation_drops_affected_pages() {
        let (store, cache) = cache();
        let listing = listing("sale");
        let unfiltered = ListingQuery {
            page: PageRequest::new(1, 10),
            ..ListingQuery::default()
        };
        let by_old_type = ListingQuery {
            page: PageRequest::new(2, 20),
            listing_type: Filter::Exact("rental".to_string()),
            search: Filter::Any,
        };
        let untracked = ListingQuery {
            page: PageRequest::new(9, 10),
            ..ListingQuery::default()
        };
        let page = Page::new(vec![listing.clone()], PageRequest::new(1, 10), 1);
        for query in [&unfiltered, &by_old_type, &untracked] {
            cache.listing_pages.populate(query, &page).await;
        }
        cache.listings.populate(&listing.id, &listing).await;

        cache.invalidate_listing(&listing, Some("rental")).await;

        assert!(!store.contains(cache_keys::listing(listing.id).as_str()));
        assert!(!store.contains(cache_keys::listing_page(&unfiltered).as_str()));
        assert!(!store.contains(cache_keys::listing_page(&by_old_type).as_str()));
        // Outside the tracked depth; left to expire.
        assert!(store.contains(cache_keys::listing_page(&untracked).as_str()));
    }

    #[tokio::test]
    async fn test_proposal_mutation_drops_status_pages() {
        let (store, cache) = cache();
        let mut proposal = Proposal::new(ListingId::new(), UserId::new(), "Offer".to_string(), 100);
        let pending = ProposalQuery {
            listing_id: proposal.listing_id,
            status: Filter::Exact(ProposalStatus::Pending),
            page: PageRequest::new(1, 10),
        };
        let page = Page::new(vec![proposal.clone()], PageRequest::new(1, 10), 1);
        cache.proposal_pages.populate(&pending, &page).await;

        proposal.status = ProposalStatus::Accepted;
        cache
            .invalidate_proposal(&proposal, Some(ProposalStatus::Pending))
            .await;

        assert!(!store.contains(cache_keys::proposals_for_listing(&pending).as_str()));
    }
}
