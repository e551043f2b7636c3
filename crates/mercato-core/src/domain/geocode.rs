//! Geocoding values.

use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Creates coordinates.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A forward geocoding request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeocodeQuery {
    /// Free-text place query.
    pub query: String,
    /// Restricts results to a country (ISO 3166-1 alpha-2).
    pub country: crate::Filter<String>,
}

/// A place resolved by the geocoding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeocodeResult {
    pub display_name: String,
    pub coordinates: Coordinates,
    pub country_code: Option<String>,
}
