//! Contact and favorite DTOs.

use mercato_core::{ListingId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to add someone to the caller's contacts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddContactRequest {
    pub contact_id: UserId,

    #[validate(length(max = 280, message = "Note cannot exceed 280 characters"))]
    pub note: Option<String>,
}

/// Request to bookmark a listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddFavoriteRequest {
    pub listing_id: ListingId,
}
