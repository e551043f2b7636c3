//! User controller: accounts and the per-user collections.

use crate::{
    extractors::{parse_id, ApiQuery, CacheBypass, PageQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use mercato_core::{Contact, ErrorEnvelope, Favorite, Listing, ListingId, Page, UserId, UserRecord};
use mercato_service::{AddContactRequest, AddFavoriteRequest};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_user))
        .route("/:id/listings", get(list_user_listings))
        .route("/:id/contacts", get(list_contacts).post(add_contact))
        .route("/:id/favorites", get(list_favorites).post(add_favorite))
        .route("/:id/favorites/:listing_id", delete(remove_favorite))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    parse_id("id", raw, UserId::parse)
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserRecord),
        (status = 400, description = "Malformed ID", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
) -> ApiResult<UserRecord> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.get_user(user_id, bypass).await?;
    ok(user)
}

/// List the listings a user owns, newest first.
#[utoipa::path(
    get,
    path = "/users/{id}/listings",
    tag = "users",
    params(
        ("id" = String, Path, description = "Owner ID"),
        ("page" = Option<u32>, Query, description = "Page number, 1-indexed"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page of listings"),
        (status = 400, description = "Invalid paging", body = ErrorEnvelope)
    )
)]
pub async fn list_user_listings(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Page<Listing>> {
    debug!("List listings of owner: {}", id);

    let owner_id = parse_user_id(&id)?;
    let page = query.page_request()?;
    let listings = state
        .listing_service
        .list_owner_listings(owner_id, page, bypass)
        .await?;
    ok(listings)
}

/// List a user's contacts.
#[utoipa::path(
    get,
    path = "/users/{id}/contacts",
    tag = "users",
    params(("id" = String, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "Contacts, oldest first", body = [Contact])
    )
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
) -> ApiResult<Vec<Contact>> {
    debug!("List contacts of: {}", id);

    let owner_id = parse_user_id(&id)?;
    let contacts = state.contact_service.list_contacts(owner_id, bypass).await?;
    ok(contacts)
}

/// Add a contact.
#[utoipa::path(
    post,
    path = "/users/{id}/contacts",
    tag = "users",
    params(("id" = String, Path, description = "Owner ID")),
    request_body = AddContactRequest,
    responses(
        (status = 201, description = "Contact added", body = Contact),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 409, description = "Contact already exists", body = ErrorEnvelope)
    )
)]
pub async fn add_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), AppError> {
    debug!("Add contact request: {} -> {}", id, request.contact_id);

    let owner_id = parse_user_id(&id)?;
    let contact = state.contact_service.add_contact(owner_id, request).await?;
    Ok(created(contact))
}

/// List a user's favorite listings.
#[utoipa::path(
    get,
    path = "/users/{id}/favorites",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Favorites, oldest first", body = [Favorite])
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
) -> ApiResult<Vec<Favorite>> {
    debug!("List favorites of: {}", id);

    let user_id = parse_user_id(&id)?;
    let favorites = state.favorite_service.list_favorites(user_id, bypass).await?;
    ok(favorites)
}

/// Favorite a listing.
#[utoipa::path(
    post,
    path = "/users/{id}/favorites",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = Favorite),
        (status = 404, description = "Listing not found", body = ErrorEnvelope)
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Favorite>>), AppError> {
    debug!("Add favorite request: {} -> {}", id, request.listing_id);

    let user_id = parse_user_id(&id)?;
    let favorite = state.favorite_service.add_favorite(user_id, request).await?;
    Ok(created(favorite))
}

/// Remove a favorite.
#[utoipa::path(
    delete,
    path = "/users/{id}/favorites/{listing_id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID"),
        ("listing_id" = String, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 404, description = "Favorite not found", body = ErrorEnvelope)
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((id, listing_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    debug!("Remove favorite request: {} -> {}", id, listing_id);

    let user_id = parse_user_id(&id)?;
    let listing_id = parse_id("listing_id", &listing_id, ListingId::parse)?;
    state.favorite_service.remove_favorite(user_id, listing_id).await?;
    Ok(no_content())
}
