//! Cache key registry.
//!
//! Every key the cache layer reads or writes is built here. Keys are
//! `mercato:` + a domain segment + the encoded parameters. Derivation is pure
//! and total: equal inputs give equal keys, distinct inputs give distinct keys.

use mercato_core::{
    Coordinates, Filter, GeocodeQuery, ListingId, ListingQuery, PageRequest, ProposalId, ProposalQuery,
    UserId,
};
use std::fmt;

/// Prefix for all cache keys.
const CACHE_PREFIX: &str = "mercato";

/// Token written for an unset optional parameter.
pub const NONE_TOKEN: &str = "none";

/// A fully derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    fn build(parts: fmt::Arguments<'_>) -> Self {
        Self(format!("{CACHE_PREFIX}:{parts}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escapes free text so it cannot contain a segment separator.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(ch),
        }
    }
    out
}

/// Encodes an optional filter.
///
/// `Any` becomes the sentinel token; exact values carry a leading `=` so no
/// exact value can ever render as the sentinel.
fn filter<T: fmt::Display>(value: &Filter<T>) -> String {
    match value {
        Filter::Any => NONE_TOKEN.to_string(),
        Filter::Exact(v) => format!("={}", escape(&v.to_string())),
    }
}

fn coordinate(value: f64) -> String {
    // -0.0 and 0.0 are the same point.
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.6}")
}

/// Lowercases and collapses whitespace in a free-text query.
fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// User record by ID.
#[must_use]
pub fn user_by_id(id: UserId) -> CacheKey {
    CacheKey::build(format_args!("user:id:{id}"))
}

/// Username lookup. Usernames are case-insensitive.
#[must_use]
pub fn user_by_username(username: &str) -> CacheKey {
    CacheKey::build(format_args!("user:username:{}", escape(&username.trim().to_lowercase())))
}

/// Profile information of a user.
#[must_use]
pub fn profile(user_id: UserId) -> CacheKey {
    CacheKey::build(format_args!("profile:{user_id}"))
}

/// Listing detail.
#[must_use]
pub fn listing(id: ListingId) -> CacheKey {
    CacheKey::build(format_args!("listing:id:{id}"))
}

/// One page of the filtered listing search.
#[must_use]
pub fn listing_page(query: &ListingQuery) -> CacheKey {
    CacheKey::build(format_args!(
        "listings:page:{}:limit:{}:type:{}:search:{}",
        query.page.page,
        query.page.limit,
        filter(&query.listing_type),
        filter(&query.search),
    ))
}

/// One page of a user's own listings.
#[must_use]
pub fn listings_by_owner(owner_id: UserId, page: PageRequest) -> CacheKey {
    CacheKey::build(format_args!(
        "listings:owner:{owner_id}:page:{}:limit:{}",
        page.page, page.limit
    ))
}

/// Forward geocoding result.
#[must_use]
pub fn geocode_search(query: &GeocodeQuery) -> CacheKey {
    let country = query.country.clone().map(|c| c.to_lowercase());
    CacheKey::build(format_args!(
        "geocode:search:{}:country:{}",
        escape(&normalize_query(&query.query)),
        filter(&country),
    ))
}

/// Reverse geocoding result, at six decimal places.
#[must_use]
pub fn geocode_reverse(coordinates: Coordinates) -> CacheKey {
    CacheKey::build(format_args!(
        "geocode:reverse:{}:{}",
        coordinate(coordinates.lat),
        coordinate(coordinates.lon)
    ))
}

/// Proposal detail.
#[must_use]
pub fn proposal(id: ProposalId) -> CacheKey {
    CacheKey::build(format_args!("proposal:id:{id}"))
}

/// One page of proposals on a listing.
#[must_use]
pub fn proposals_for_listing(query: &ProposalQuery) -> CacheKey {
    CacheKey::build(format_args!(
        "proposals:listing:{}:status:{}:page:{}:limit:{}",
        query.listing_id,
        filter(&query.status),
        query.page.page,
        query.page.limit,
    ))
}

/// Contact list of a user.
#[must_use]
pub fn contacts(user_id: UserId) -> CacheKey {
    CacheKey::build(format_args!("contacts:user:{user_id}"))
}

/// Favorite listings of a user.
#[must_use]
pub fn favorites(user_id: UserId) -> CacheKey {
    CacheKey::build(format_args!("favorites:user:{user_id}"))
}
