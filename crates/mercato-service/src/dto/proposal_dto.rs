//! Proposal DTOs.

use mercato_core::{ProposalStatus, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to make a proposal on a listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProposalRequest {
    pub proposer_id: UserId,

    #[validate(
        custom(function = "mercato_core::rules::not_blank"),
        length(max = 2000, message = "Message cannot exceed 2000 characters")
    )]
    pub message: String,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: i64,
}

/// Request to move a proposal to a new status.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProposalStatusRequest {
    pub status: ProposalStatus,
}
