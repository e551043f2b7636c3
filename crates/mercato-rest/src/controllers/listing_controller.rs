//! Listing controller.

use crate::{
    extractors::{parse_id, ApiQuery, CacheBypass, PageQuery, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use mercato_core::{
    ErrorEnvelope, Filter, Listing, ListingId, ListingQuery, Page, Proposal, ProposalQuery, ProposalStatus,
};
use mercato_service::{CreateProposalRequest, UpdateListingRequest};
use serde::Deserialize;
use tracing::debug;

/// Query parameters of the listing search.
#[derive(Debug, Default, Deserialize)]
pub struct ListingSearchParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub search: Option<String>,
}

/// Query parameters of the proposal list.
#[derive(Debug, Default, Deserialize)]
pub struct ProposalListParams {
    pub status: Option<ProposalStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Creates the listing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings))
        .route("/:id", get(get_listing).patch(update_listing))
        .route("/:id/proposals", get(list_proposals).post(create_proposal))
}

fn parse_listing_id(raw: &str) -> Result<ListingId, AppError> {
    parse_id("id", raw, ListingId::parse)
}

/// Search listings, newest first.
#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    params(
        ("page" = Option<u32>, Query, description = "Page number, 1-indexed"),
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("type" = Option<String>, Query, description = "Listing type"),
        ("search" = Option<String>, Query, description = "Free-text search")
    ),
    responses(
        (status = 200, description = "One page of listings"),
        (status = 400, description = "Invalid paging", body = ErrorEnvelope)
    )
)]
pub async fn list_listings(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    ApiQuery(params): ApiQuery<ListingSearchParams>,
) -> ApiResult<Page<Listing>> {
    debug!("List listings request: {:?}", params);

    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .page_request()?;
    let query = ListingQuery {
        page,
        listing_type: Filter::from_optional(params.listing_type),
        search: Filter::from_optional(params.search),
    };

    let listings = state.listing_service.list_listings(query, bypass).await?;
    ok(listings)
}

/// Get a listing by ID.
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "listings",
    params(("id" = String, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing found", body = Listing),
        (status = 404, description = "Listing not found", body = ErrorEnvelope)
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
) -> ApiResult<Listing> {
    debug!("Get listing request: {}", id);

    let listing_id = parse_listing_id(&id)?;
    let listing = state.listing_service.get_listing(listing_id, bypass).await?;
    ok(listing)
}

/// Update a listing.
#[utoipa::path(
    patch,
    path = "/listings/{id}",
    tag = "listings",
    params(("id" = String, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = Listing),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 404, description = "Listing not found", body = ErrorEnvelope)
    )
)]
pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateListingRequest>,
) -> ApiResult<Listing> {
    debug!("Update listing request: {}", id);

    let listing_id = parse_listing_id(&id)?;
    let listing = state.listing_service.update_listing(listing_id, request).await?;
    ok(listing)
}

/// List the proposals made on a listing, newest first.
#[utoipa::path(
    get,
    path = "/listings/{id}/proposals",
    tag = "proposals",
    params(
        ("id" = String, Path, description = "Listing ID"),
        ("status" = Option<ProposalStatus>, Query, description = "Proposal status"),
        ("page" = Option<u32>, Query, description = "Page number, 1-indexed"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page of proposals")
    )
)]
pub async fn list_proposals(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<ProposalListParams>,
) -> ApiResult<Page<Proposal>> {
    debug!("List proposals request: {} {:?}", id, params);

    let listing_id = parse_listing_id(&id)?;
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .page_request()?;
    let query = ProposalQuery {
        listing_id,
        status: params.status.into(),
        page,
    };

    let proposals = state.proposal_service.list_for_listing(query, bypass).await?;
    ok(proposals)
}

/// Make a proposal on a listing.
#[utoipa::path(
    post,
    path = "/listings/{id}/proposals",
    tag = "proposals",
    params(("id" = String, Path, description = "Listing ID")),
    request_body = CreateProposalRequest,
    responses(
        (status = 201, description = "Proposal created", body = Proposal),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 403, description = "Owner cannot propose on own listing", body = ErrorEnvelope),
        (status = 404, description = "Listing not found", body = ErrorEnvelope)
    )
)]
pub async fn create_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateProposalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Proposal>>), AppError> {
    debug!("Create proposal request on listing: {}", id);

    let listing_id = parse_listing_id(&id)?;
    let proposal = state.proposal_service.create_proposal(listing_id, request).await?;
    Ok(created(proposal))
}
