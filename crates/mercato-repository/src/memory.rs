//! In-memory implementation of every repository trait.

use crate::traits::{
    ContactRepository, FavoriteRepository, GeocodingProvider, ListingRepository, ProfileRepository,
    ProposalRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use mercato_core::{
    Contact, Coordinates, Favorite, GeocodeQuery, GeocodeResult, Listing, ListingChanges, ListingId,
    ListingQuery, MercatoError, MercatoResult, Page, PageRequest, ProfileChanges, ProfileInfo, Proposal,
    ProposalId, ProposalQuery, ProposalStatus, UserId, UserRecord,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::warn;

/// Largest distance, in degrees, at which a reverse lookup still matches.
const REVERSE_MATCH_RADIUS_DEG: f64 = 0.5;

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserRecord>,
    profiles: HashMap<UserId, ProfileInfo>,
    listings: HashMap<ListingId, Listing>,
    places: Vec<GeocodeResult>,
    proposals: HashMap<ProposalId, Proposal>,
    contacts: HashMap<UserId, Vec<Contact>>,
    favorites: HashMap<UserId, Vec<Favorite>>,
}

/// Marketplace backend held in process memory.
///
/// Counts every read so tests can tell cache hits from backend reads, and
/// can be switched into a failing mode to simulate backend outages on writes.
#[derive(Default)]
pub struct InMemoryMarketplace {
    state: RwLock<State>,
    reads: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryMarketplace {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many read operations have been served.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Makes every write fail with an external error until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Inserts or replaces a user.
    pub fn insert_user(&self, user: UserRecord) {
        self.state.write().users.insert(user.id, user);
    }

    /// Inserts or replaces a profile.
    pub fn insert_profile(&self, profile: ProfileInfo) {
        self.state.write().profiles.insert(profile.user_id, profile);
    }

    /// Inserts or replaces a listing.
    pub fn insert_listing(&self, listing: Listing) {
        self.state.write().listings.insert(listing.id, listing);
    }

    /// Adds a known place to the gazetteer.
    pub fn insert_place(&self, place: GeocodeResult) {
        self.state.write().places.push(place);
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn check_writable(&self, operation: &str) -> MercatoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            warn!("Rejecting {}: backend is failing writes", operation);
            return Err(MercatoError::external(
                "memory",
                format!("{operation} rejected: backend unavailable"),
            ));
        }
        Ok(())
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepository for InMemoryMarketplace {
    async fn find_by_id(&self, id: UserId) -> MercatoResult<Option<UserRecord>> {
        self.record_read();
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> MercatoResult<Option<UserRecord>> {
        self.record_read();
        Ok(self
            .state
            .read()
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryMarketplace {
    async fn find_profile(&self, user_id: UserId) -> MercatoResult<Option<ProfileInfo>> {
        self.record_read();
        Ok(self.state.read().profiles.get(&user_id).cloned())
    }

    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> MercatoResult<ProfileInfo> {
        self.check_writable("profile update")?;
        let mut state = self.state.write();
        let profile = state
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| MercatoError::not_found("Profile", user_id))?;
        profile.apply(changes);
        Ok(profile.clone())
    }
}

#[async_trait]
impl ListingRepository for InMemoryMarketplace {
    async fn find_page(&self, query: &ListingQuery) -> MercatoResult<Page<Listing>> {
        self.record_read();
        let mut matching: Vec<Listing> = self
            .state
            .read()
            .listings
            .values()
            .filter(|l| l.matches(query))
            .cloned()
            .collect();
        newest_first(&mut matching, |l| l.created_at);
        Ok(Page::from_slice(&matching, query.page))
    }

    async fn find_by_id(&self, id: ListingId) -> MercatoResult<Option<Listing>> {
        self.record_read();
        Ok(self.state.read().listings.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> MercatoResult<Page<Listing>> {
        self.record_read();
        let mut owned: Vec<Listing> = self
            .state
            .read()
            .listings
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut owned, |l| l.created_at);
        Ok(Page::from_slice(&owned, page))
    }

    async fn update(&self, id: ListingId, changes: ListingChanges) -> MercatoResult<Listing> {
        self.check_writable("listing update")?;
        let mut state = self.state.write();
        let listing = state
            .listings
            .get_mut(&id)
            .ok_or_else(|| MercatoError::not_found("Listing", id))?;
        listing.apply(changes);
        Ok(listing.clone())
    }
}

#[async_trait]
impl GeocodingProvider for InMemoryMarketplace {
    async fn search(&self, query: &GeocodeQuery) -> MercatoResult<Vec<GeocodeResult>> {
        self.record_read();
        let needle = query.query.trim().to_lowercase();
        Ok(self
            .state
            .read()
            .places
            .iter()
            .filter(|p| p.display_name.to_lowercase().contains(&needle))
            .filter(|p| match query.country.as_exact() {
                None => true,
                Some(country) => p
                    .country_code
                    .as_deref()
                    .is_some_and(|code| code.eq_ignore_ascii_case(country)),
            })
            .cloned()
            .collect())
    }

    async fn reverse(&self, coordinates: Coordinates) -> MercatoResult<Option<GeocodeResult>> {
        self.record_read();
        let distance = |p: &GeocodeResult| {
            let dlat = p.coordinates.lat - coordinates.lat;
            let dlon = p.coordinates.lon - coordinates.lon;
            (dlat * dlat + dlon * dlon).sqrt()
        };
        Ok(self
            .state
            .read()
            .places
            .iter()
            .filter(|p| distance(p) <= REVERSE_MATCH_RADIUS_DEG)
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
            .cloned())
    }
}

#[async_trait]
impl ProposalRepository for InMemoryMarketplace {
    async fn find_by_id(&self, id: ProposalId) -> MercatoResult<Option<Proposal>> {
        self.record_read();
        Ok(self.state.read().proposals.get(&id).cloned())
    }

    async fn find_for_listing(&self, query: &ProposalQuery) -> MercatoResult<Page<Proposal>> {
        self.record_read();
        let mut matching: Vec<Proposal> = self
            .state
            .read()
            .proposals
            .values()
            .filter(|p| p.listing_id == query.listing_id && query.status.matches(&p.status))
            .cloned()
            .collect();
        newest_first(&mut matching, |p| p.created_at);
        Ok(Page::from_slice(&matching, query.page))
    }

    async fn create(&self, proposal: &Proposal) -> MercatoResult<Proposal> {
        self.check_writable("proposal create")?;
        let mut state = self.state.write();
        if !state.listings.contains_key(&proposal.listing_id) {
            return Err(MercatoError::not_found("Listing", proposal.listing_id));
        }
        state.proposals.insert(proposal.id, proposal.clone());
        Ok(proposal.clone())
    }

    async fn update_status(&self, id: ProposalId, status: ProposalStatus) -> MercatoResult<Proposal> {
        self.check_writable("proposal status update")?;
        let mut state = self.state.write();
        let proposal = state
            .proposals
            .get_mut(&id)
            .ok_or_else(|| MercatoError::not_found("Proposal", id))?;
        proposal.status = status;
        proposal.updated_at = Utc::now();
        Ok(proposal.clone())
    }
}

#[async_trait]
impl ContactRepository for InMemoryMarketplace {
    async fn list_contacts(&self, owner_id: UserId) -> MercatoResult<Vec<Contact>> {
        self.record_read();
        Ok(self
            .state
            .read()
            .contacts
            .get(&owner_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_contact(&self, contact: &Contact) -> MercatoResult<Contact> {
        self.check_writable("contact insert")?;
        let mut state = self.state.write();
        if !state.users.contains_key(&contact.contact_id) {
            return Err(MercatoError::not_found("User", contact.contact_id));
        }
        let contacts = state.contacts.entry(contact.owner_id).or_default();
        if contacts.iter().any(|c| c.contact_id == contact.contact_id) {
            return Err(MercatoError::conflict("Contact already exists"));
        }
        contacts.push(contact.clone());
        Ok(contact.clone())
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryMarketplace {
    async fn list_favorites(&self, user_id: UserId) -> MercatoResult<Vec<Favorite>> {
        self.record_read();
        Ok(self
            .state
            .read()
            .favorites
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_favorite(&self, user_id: UserId, listing_id: ListingId) -> MercatoResult<Favorite> {
        self.check_writable("favorite insert")?;
        let mut state = self.state.write();
        if !state.listings.contains_key(&listing_id) {
            return Err(MercatoError::not_found("Listing", listing_id));
        }
        let favorites = state.favorites.entry(user_id).or_default();
        if let Some(existing) = favorites.iter().find(|f| f.listing_id == listing_id) {
            return Ok(existing.clone());
        }
        let favorite = Favorite {
            user_id,
            listing_id,
            added_at: Utc::now(),
        };
        favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> MercatoResult<bool> {
        self.check_writable("favorite removal")?;
        let mut state = self.state.write();
        let Some(favorites) = state.favorites.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = favorites.len();
        favorites.retain(|f| f.listing_id != listing_id);
        Ok(favorites.len() != before)
    }
}
