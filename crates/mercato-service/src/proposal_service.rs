//! Proposals on listings.

use crate::cache::MarketplaceCache;
use crate::dto::{CreateProposalRequest, UpdateProposalStatusRequest};
use crate::failure::or_domain_failure;
use mercato_core::{
    DomainFailure, ListingId, MercatoError, MercatoResult, Page, PageRequest, Proposal, ProposalId,
    ProposalQuery, ValidateExt,
};
use mercato_repository::{ListingRepository, ProposalRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Cached proposal reads, proposal creation and status changes.
pub struct ProposalService {
    proposals: Arc<dyn ProposalRepository>,
    listings: Arc<dyn ListingRepository>,
    cache: Arc<MarketplaceCache>,
}

impl ProposalService {
    /// Creates a new proposal service.
    pub fn new(
        proposals: Arc<dyn ProposalRepository>,
        listings: Arc<dyn ListingRepository>,
        cache: Arc<MarketplaceCache>,
    ) -> Self {
        Self {
            proposals,
            listings,
            cache,
        }
    }

    /// Gets a proposal by ID.
    pub async fn get_proposal(&self, id: ProposalId, bypass: bool) -> MercatoResult<Proposal> {
        debug!("Getting proposal: {}", id);

        self.cache
            .proposals
            .get_or_load(&id, bypass, || async move {
                self.proposals
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| MercatoError::not_found("Proposal", id))
            })
            .await
    }

    /// Returns one page of proposals on a listing.
    pub async fn list_for_listing(&self, query: ProposalQuery, bypass: bool) -> MercatoResult<Page<Proposal>> {
        PageRequest::validated(query.page.page, query.page.limit)?;
        debug!(
            "Listing proposals of {} page {}, status: {:?}",
            query.listing_id, query.page.page, query.status
        );

        self.cache
            .proposal_pages
            .get_or_load(&query, bypass, || self.proposals.find_for_listing(&query))
            .await
    }

    /// Makes a proposal on a listing.
    pub async fn create_proposal(
        &self,
        listing_id: ListingId,
        request: CreateProposalRequest,
    ) -> MercatoResult<Proposal> {
        debug!("Creating proposal on listing: {}", listing_id);

        request.validate_request()?;

        let listing = self
            .listings
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| MercatoError::not_found("Listing", listing_id))?;

        if listing.owner_id == request.proposer_id {
            return Err(MercatoError::forbidden(
                "Owners are not authorized to make proposals on their own listings",
            ));
        }

        let proposal = Proposal::new(
            listing_id,
            request.proposer_id,
            request.message,
            request.amount_cents,
        );
        let created = self
            .proposals
            .create(&proposal)
            .await
            .map_err(|e| or_domain_failure(e, DomainFailure::CreateProposalFailed))?;

        self.cache.invalidate_proposal(&created, None).await;

        info!("Proposal created: {} on listing {}", created.id, listing_id);
        Ok(created)
    }

    /// Moves a proposal to a new status. Only pending proposals can move.
    pub async fn update_status(
        &self,
        id: ProposalId,
        request: UpdateProposalStatusRequest,
    ) -> MercatoResult<Proposal> {
        debug!("Updating proposal status: {} -> {}", id, request.status);

        let current = self
            .proposals
            .find_by_id(id)
            .await?
            .ok_or_else(|| MercatoError::not_found("Proposal", id))?;

        if !current.status.can_transition_to(request.status) {
            return Err(DomainFailure::InvalidProposalTransition {
                from: current.status.to_string(),
                to: request.status.to_string(),
            }
            .into());
        }

        let updated = self.proposals.update_status(id, request.status).await?;

        self.cache
            .invalidate_proposal(&updated, Some(current.status))
            .await;

        info!("Proposal {} is now {}", id, updated.status);
        Ok(updated)
    }
}

impl std::fmt::Debug for ProposalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalService").finish_non_exhaustive()
    }
}
