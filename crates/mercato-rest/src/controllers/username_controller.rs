//! Username resolution.

use crate::{
    extractors::CacheBypass,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use mercato_core::{ErrorEnvelope, UsernameLookup};
use tracing::debug;

/// Creates the username router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:username", get(resolve_username))
}

/// Resolve a username to its user ID. Matching is case-insensitive.
#[utoipa::path(
    get,
    path = "/usernames/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Username resolved", body = UsernameLookup),
        (status = 404, description = "Unknown username", body = ErrorEnvelope)
    )
)]
pub async fn resolve_username(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(username): Path<String>,
) -> ApiResult<UsernameLookup> {
    debug!("Resolve username request: {}", username);

    let lookup = state.user_service.resolve_username(&username, bypass).await?;
    ok(lookup)
}
