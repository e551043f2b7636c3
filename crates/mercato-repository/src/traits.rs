//! Repository trait definitions.

use async_trait::async_trait;
use mercato_core::{
    Contact, Coordinates, Favorite, GeocodeQuery, GeocodeResult, Listing, ListingChanges, ListingId,
    ListingQuery, MercatoResult, Page, PageRequest, ProfileChanges, ProfileInfo, Proposal, ProposalId,
    ProposalQuery, ProposalStatus, UserId, UserRecord,
};

/// Accounts held by the auth backend.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> MercatoResult<Option<UserRecord>>;

    /// Finds a user by username, case-insensitively.
    async fn find_by_username(&self, username: &str) -> MercatoResult<Option<UserRecord>>;
}

/// Public profile data.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile of a user.
    async fn find_profile(&self, user_id: UserId) -> MercatoResult<Option<ProfileInfo>>;

    /// Applies changes to a profile and returns the stored result.
    async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> MercatoResult<ProfileInfo>;
}

/// Listings.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Returns one page of listings matching the query, newest first.
    async fn find_page(&self, query: &ListingQuery) -> MercatoResult<Page<Listing>>;

    /// Finds a listing by ID.
    async fn find_by_id(&self, id: ListingId) -> MercatoResult<Option<Listing>>;

    /// Returns one page of the listings owned by a user, newest first.
    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> MercatoResult<Page<Listing>>;

    /// Applies changes to a listing and returns the stored result.
    async fn update(&self, id: ListingId, changes: ListingChanges) -> MercatoResult<Listing>;
}

/// Place search provider.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolves a free-text query to candidate places.
    async fn search(&self, query: &GeocodeQuery) -> MercatoResult<Vec<GeocodeResult>>;

    /// Resolves coordinates to the nearest known place.
    async fn reverse(&self, coordinates: Coordinates) -> MercatoResult<Option<GeocodeResult>>;
}

/// Proposals on listings.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Finds a proposal by ID.
    async fn find_by_id(&self, id: ProposalId) -> MercatoResult<Option<Proposal>>;

    /// Returns one page of proposals on a listing, newest first.
    async fn find_for_listing(&self, query: &ProposalQuery) -> MercatoResult<Page<Proposal>>;

    /// Stores a new proposal.
    async fn create(&self, proposal: &Proposal) -> MercatoResult<Proposal>;

    /// Changes the status of a proposal and returns the stored result.
    async fn update_status(&self, id: ProposalId, status: ProposalStatus) -> MercatoResult<Proposal>;
}

/// Per-user contact lists.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Lists a user's contacts, oldest first.
    async fn list_contacts(&self, owner_id: UserId) -> MercatoResult<Vec<Contact>>;

    /// Adds a contact.
    async fn add_contact(&self, contact: &Contact) -> MercatoResult<Contact>;
}

/// Per-user favorite listings.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Lists a user's favorites, oldest first.
    async fn list_favorites(&self, user_id: UserId) -> MercatoResult<Vec<Favorite>>;

    /// Adds a favorite. Adding an existing favorite returns it unchanged.
    async fn add_favorite(&self, user_id: UserId, listing_id: ListingId) -> MercatoResult<Favorite>;

    /// Removes a favorite. Returns true if it existed.
    async fn remove_favorite(&self, user_id: UserId, listing_id: ListingId) -> MercatoResult<bool>;
}
