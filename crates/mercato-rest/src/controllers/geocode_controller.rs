//! Geocoding controller.

use crate::{
    extractors::{ApiQuery, CacheBypass},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::get, Router};
use mercato_core::{Coordinates, ErrorEnvelope, Filter, GeocodeQuery, GeocodeResult};
use serde::Deserialize;
use tracing::debug;

/// Query parameters of a forward lookup.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub country: Option<String>,
}

/// Query parameters of a reverse lookup.
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lon: f64,
}

/// Creates the geocoding router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/reverse", get(reverse))
}

/// Resolve a place name to candidate places.
#[utoipa::path(
    get,
    path = "/geocode/search",
    tag = "geocode",
    params(
        ("q" = String, Query, description = "Place query"),
        ("country" = Option<String>, Query, description = "ISO 3166-1 alpha-2 country code")
    ),
    responses(
        (status = 200, description = "Candidate places", body = [GeocodeResult]),
        (status = 400, description = "Missing query", body = ErrorEnvelope)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Vec<GeocodeResult>> {
    debug!("Geocode search request: {:?}", params);

    let query = GeocodeQuery {
        query: params.q,
        country: Filter::from_optional(params.country),
    };
    let results = state.geocoding_service.search(query, bypass).await?;
    ok(results)
}

/// Resolve coordinates to the nearest known place.
#[utoipa::path(
    get,
    path = "/geocode/reverse",
    tag = "geocode",
    params(
        ("lat" = f64, Query, description = "Latitude"),
        ("lon" = f64, Query, description = "Longitude")
    ),
    responses(
        (status = 200, description = "Nearest place", body = GeocodeResult),
        (status = 400, description = "Coordinates out of range", body = ErrorEnvelope),
        (status = 404, description = "No place nearby", body = ErrorEnvelope)
    )
)]
pub async fn reverse(
    State(state): State<AppState>,
    CacheBypass(bypass): CacheBypass,
    ApiQuery(params): ApiQuery<ReverseParams>,
) -> ApiResult<GeocodeResult> {
    debug!("Geocode reverse request: {}, {}", params.lat, params.lon);

    let place = state
        .geocoding_service
        .reverse(Coordinates::new(params.lat, params.lon), bypass)
        .await?;
    ok(place)
}
