//! OpenAPI documentation configuration.

use crate::controllers::health_controller::HealthResponse;
use mercato_core::{
    Contact, Coordinates, ErrorEnvelope, Favorite, FieldError, GeocodeResult, Listing, ListingId, ProfileInfo,
    Proposal, ProposalId, ProposalStatus, UserId, UserRecord, UsernameLookup,
};
use mercato_service::{
    AddContactRequest, AddFavoriteRequest, CreateProposalRequest, UpdateListingRequest, UpdateProfileRequest,
    UpdateProposalStatusRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Mercato API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mercato API",
        version = "1.0.0",
        description = "Marketplace data access with a Redis cache in front of every read",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Users
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::list_user_listings,
        crate::controllers::user_controller::list_contacts,
        crate::controllers::user_controller::add_contact,
        crate::controllers::user_controller::list_favorites,
        crate::controllers::user_controller::add_favorite,
        crate::controllers::user_controller::remove_favorite,
        crate::controllers::username_controller::resolve_username,
        // Profiles
        crate::controllers::profile_controller::get_profile,
        crate::controllers::profile_controller::update_profile,
        // Listings
        crate::controllers::listing_controller::list_listings,
        crate::controllers::listing_controller::get_listing,
        crate::controllers::listing_controller::update_listing,
        // Proposals
        crate::controllers::listing_controller::list_proposals,
        crate::controllers::listing_controller::create_proposal,
        crate::controllers::proposal_controller::get_proposal,
        crate::controllers::proposal_controller::update_proposal_status,
        // Geocoding
        crate::controllers::geocode_controller::search,
        crate::controllers::geocode_controller::reverse,
        // Health
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            ListingId,
            ProposalId,
            ErrorEnvelope,
            FieldError,
            UserRecord,
            UsernameLookup,
            ProfileInfo,
            Listing,
            Coordinates,
            GeocodeResult,
            Proposal,
            ProposalStatus,
            Contact,
            Favorite,
            HealthResponse,
            UpdateProfileRequest,
            UpdateListingRequest,
            CreateProposalRequest,
            UpdateProposalStatusRequest,
            AddContactRequest,
            AddFavoriteRequest,
        )
    ),
    tags(
        (name = "users", description = "Accounts, contacts and favorites"),
        (name = "profiles", description = "Public profiles"),
        (name = "listings", description = "Marketplace listings"),
        (name = "proposals", description = "Proposals on listings"),
        (name = "geocode", description = "Place lookup"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_cached_reads() {
        let doc = ApiDoc::openapi();
        for path in ["/users/{id}", "/listings", "/geocode/reverse", "/proposals/{id}/status"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
