//! Profile controller.

use crate::{
    controllers::user_controller::parse_user_id,
    extractors::{CacheBypass, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use mercato_core::{ErrorEnvelope, ProfileInfo};
use mercato_service::UpdateProfileRequest;
use tracing::debug;

/// Creates the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:user_id", get(get_profile).patch(update_profile))
}

/// Get a user's profile.
#[utoipa::path(
    get,
    path = "/profiles/{user_id}",
    tag = "profiles",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile found", body = ProfileInfo),
        (status = 404, description = "Profile not found", body = ErrorEnvelope)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileInfo> {
    debug!("Get profile request: {}", user_id);

    let user_id = parse_user_id(&user_id)?;
    let profile = state.profile_service.get_profile(user_id, bypass).await?;
    ok(profile)
}

/// Update a user's profile.
#[utoipa::path(
    patch,
    path = "/profiles/{user_id}",
    tag = "profiles",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileInfo),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 500, description = "Failed to update profile", body = ErrorEnvelope)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<ProfileInfo> {
    debug!("Update profile request: {}", user_id);

    let user_id = parse_user_id(&user_id)?;
    let profile = state.profile_service.update_profile(user_id, request).await?;
    ok(profile)
}
