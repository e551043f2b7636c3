//! Proposals made by buyers on listings.

use crate::{Filter, ListingId, PageRequest, ProposalId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ProposalStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Only pending proposals can change state.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Rejected | Self::Withdrawn)
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An offer on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Proposal {
    pub id: ProposalId,
    pub listing_id: ListingId,
    pub proposer_id: UserId,
    pub message: String,
    pub amount_cents: i64,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Creates a pending proposal.
    #[must_use]
    pub fn new(listing_id: ListingId, proposer_id: UserId, message: String, amount_cents: i64) -> Self {
        let now = Utc::now();
        Self {
            id: ProposalId::new(),
            listing_id,
            proposer_id,
            message,
            amount_cents,
            status: ProposalStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Proposals on one listing, optionally narrowed to a status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProposalQuery {
    pub listing_id: ListingId,
    pub status: Filter<ProposalStatus>,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_proposals_transition() {
        assert!(ProposalStatus::Pending.can_transition_to(ProposalStatus::Accepted));
        assert!(ProposalStatus::Pending.can_transition_to(ProposalStatus::Withdrawn));
        assert!(!ProposalStatus::Pending.can_transition_to(ProposalStatus::Pending));
        assert!(!ProposalStatus::Accepted.can_transition_to(ProposalStatus::Rejected));
    }

    #[test]
    fn test_status_wire_name() {
        let json = serde_json::to_string(&ProposalStatus::Withdrawn).unwrap();
        assert_eq!(json, "\"withdrawn\"");
        assert_eq!(ProposalStatus::Accepted.to_string(), "accepted");
    }
}
