//! Listing DTOs.

use mercato_core::ListingChanges;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to update a listing. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateListingRequest {
    #[validate(
        custom(function = "mercato_core::rules::not_blank"),
        length(max = 120, message = "Title cannot exceed 120 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 32, message = "Listing type must be 1-32 characters"))]
    pub listing_type: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: Option<i64>,

    #[validate(length(max = 128))]
    pub location: Option<String>,
}

impl From<UpdateListingRequest> for ListingChanges {
    fn from(request: UpdateListingRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            listing_type: request.listing_type,
            price_cents: request.price_cents,
            location: request.location,
        }
    }
}
