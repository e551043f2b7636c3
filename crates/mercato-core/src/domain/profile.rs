//! Public profile information.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile details shown on a seller's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProfileInfo {
    pub user_id: UserId,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Changes applied to a profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

impl ProfileInfo {
    /// Applies a set of changes and bumps `updated_at`.
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(display_name) = changes.display_name {
            self.display_name = display_name;
        }
        if changes.bio.is_some() {
            self.bio = changes.bio;
        }
        if changes.avatar_url.is_some() {
            self.avatar_url = changes.avatar_url;
        }
        if changes.location.is_some() {
            self.location = changes.location;
        }
        if changes.phone.is_some() {
            self.phone = changes.phone;
        }
        self.updated_at = Utc::now();
    }
}
