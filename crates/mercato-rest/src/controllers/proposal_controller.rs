//! Proposal controller.

use crate::{
    extractors::{parse_id, CacheBypass, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};
use mercato_core::{ErrorEnvelope, Proposal, ProposalId};
use mercato_service::UpdateProposalStatusRequest;
use tracing::debug;

/// Creates the proposal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_proposal))
        .route("/:id/status", patch(update_proposal_status))
}

/// Get a proposal by ID.
#[utoipa::path(
    get,
    path = "/proposals/{id}",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal ID")),
    responses(
        (status = 200, description = "Proposal found", body = Proposal),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope)
    )
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
) -> ApiResult<Proposal> {
    debug!("Get proposal request: {}", id);

    let proposal_id = parse_id("id", &id, ProposalId::parse)?;
    let proposal = state.proposal_service.get_proposal(proposal_id, bypass).await?;
    ok(proposal)
}

/// Accept, reject or withdraw a pending proposal.
#[utoipa::path(
    patch,
    path = "/proposals/{id}/status",
    tag = "proposals",
    params(("id" = String, Path, description = "Proposal ID")),
    request_body = UpdateProposalStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Proposal),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 409, description = "Proposal is no longer pending", body = ErrorEnvelope)
    )
)]
pub async fn update_proposal_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProposalStatusRequest>,
) -> ApiResult<Proposal> {
    debug!("Update proposal status request: {} -> {}", id, request.status);

    let proposal_id = parse_id("id", &id, ProposalId::parse)?;
    let proposal = state.proposal_service.update_status(proposal_id, request).await?;
    ok(proposal)
}
