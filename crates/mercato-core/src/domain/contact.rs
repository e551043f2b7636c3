//! Contacts and favorites.

use crate::{ListingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user saved in another user's contact list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contact {
    pub owner_id: UserId,
    pub contact_id: UserId,
    pub note: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// A listing bookmarked by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Favorite {
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub added_at: DateTime<Utc>,
}
