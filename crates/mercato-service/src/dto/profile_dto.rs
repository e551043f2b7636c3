//! Profile DTOs.

use mercato_core::ProfileChanges;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to update profile information. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 128))]
    pub location: Option<String>,

    #[validate(length(max = 32, message = "Phone cannot exceed 32 characters"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            display_name: request.display_name,
            bio: request.bio,
            avatar_url: request.avatar_url,
            location: request.location,
            phone: request.phone,
        }
    }
}
