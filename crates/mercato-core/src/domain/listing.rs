//! Listings.

use crate::{Coordinates, Filter, ListingId, PageRequest, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item or service offered on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    /// Free-form category, e.g. `sale`, `rental`, `service`.
    pub listing_type: String,
    pub price_cents: i64,
    pub currency: String,
    pub location: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Returns true if the listing satisfies the query filters.
    #[must_use]
    pub fn matches(&self, query: &ListingQuery) -> bool {
        let type_ok = query.listing_type.matches(&self.listing_type);
        let search_ok = match &query.search {
            Filter::Any => true,
            Filter::Exact(term) => {
                let term = term.to_lowercase();
                self.title.to_lowercase().contains(&term)
                    || self.description.to_lowercase().contains(&term)
            }
        };
        type_ok && search_ok
    }
}

/// Changes applied to a listing. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub listing_type: Option<String>,
    pub price_cents: Option<i64>,
    pub location: Option<String>,
}

impl Listing {
    /// Applies a set of changes and bumps `updated_at`.
    pub fn apply(&mut self, changes: ListingChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(listing_type) = changes.listing_type {
            self.listing_type = listing_type;
        }
        if let Some(price_cents) = changes.price_cents {
            self.price_cents = price_cents;
        }
        if changes.location.is_some() {
            self.location = changes.location;
        }
        self.updated_at = Utc::now();
    }
}

/// A paginated, filtered listing search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ListingQuery {
    pub page: PageRequest,
    pub listing_type: Filter<String>,
    pub search: Filter<String>,
}
