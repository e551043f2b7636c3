//! Forward and reverse geocoding.

use crate::cache::MarketplaceCache;
use mercato_core::{
    rules, Coordinates, FieldError, GeocodeQuery, GeocodeResult, MercatoError, MercatoResult,
};
use mercato_repository::GeocodingProvider;
use std::sync::Arc;
use tracing::debug;

/// Cached place search. Results change rarely, so entries live for a day.
pub struct GeocodingService {
    provider: Arc<dyn GeocodingProvider>,
    cache: Arc<MarketplaceCache>,
}

impl GeocodingService {
    pub fn new(provider: Arc<dyn GeocodingProvider>, cache: Arc<MarketplaceCache>) -> Self {
        Self { provider, cache }
    }

    /// Resolves a free-text query to candidate places.
    pub async fn search(&self, query: GeocodeQuery, bypass: bool) -> MercatoResult<Vec<GeocodeResult>> {
        if query.query.trim().is_empty() {
            return Err(MercatoError::invalid_field("q", "Search query is required"));
        }
        debug!("Geocoding '{}'", query.query);

        self.cache
            .geocode_search
            .get_or_load(&query, bypass, || self.provider.search(&query))
            .await
    }

    /// Resolves coordinates to the nearest known place.
    pub async fn reverse(&self, coordinates: Coordinates, bypass: bool) -> MercatoResult<GeocodeResult> {
        validate_coordinates(coordinates)?;
        debug!("Reverse geocoding {}, {}", coordinates.lat, coordinates.lon);

        self.cache
            .geocode_reverse
            .get_or_load(&coordinates, bypass, || async move {
                self.provider.reverse(coordinates).await?.ok_or_else(|| {
                    MercatoError::not_found("Place", format!("{:.6},{:.6}", coordinates.lat, coordinates.lon))
                })
            })
            .await
    }
}

fn validate_coordinates(coordinates: Coordinates) -> MercatoResult<()> {
    let mut violations = Vec::new();
    if rules::latitude(coordinates.lat).is_err() {
        violations.push(FieldError::new("lat", "Latitude must be between -90 and 90"));
    }
    if rules::longitude(coordinates.lon).is_err() {
        violations.push(FieldError::new("lon", "Longitude must be between -180 and 180"));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(MercatoError::Validation(violations))
    }
}

impl std::fmt::Debug for GeocodingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;
    use mercato_core::Filter;

    fn porto() -> GeocodeResult {
        GeocodeResult {
            display_name: "Porto, Portugal".to_string(),
            coordinates: Coordinates::new(41.1579, -8.6291),
            country_code: Some("pt".to_string()),
        }
    }

    #[tokio::test]
    async fn test_equivalent_queries_share_an_entry() {
        let fx = fixture();
        fx.backend.insert_place(porto());
        let service = GeocodingService::new(fx.backend.clone(), fx.cache.clone());

        let first = GeocodeQuery {
            query: "Porto".to_string(),
            country: Filter::Exact("PT".to_string()),
        };
        let second = GeocodeQuery {
            query: "  porto ".to_string(),
            country: Filter::Exact("pt".to_string()),
        };

        assert_eq!(service.search(first, false).await.unwrap().len(), 1);
        assert_eq!(service.search(second, false).await.unwrap().len(), 1);
        assert_eq!(fx.backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_reverse_is_cached() {
        let fx = fixture();
        fx.backend.insert_place(porto());
        let service = GeocodingService::new(fx.backend.clone(), fx.cache.clone());
        let point = Coordinates::new(41.15, -8.61);

        let place = service.reverse(point, false).await.unwrap();
        service.reverse(point, false).await.unwrap();

        assert_eq!(place.display_name, "Porto, Portugal");
        assert_eq!(fx.backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates() {
        let fx = fixture();
        let service = GeocodingService::new(fx.backend.clone(), fx.cache.clone());

        match service.reverse(Coordinates::new(95.0, 200.0), false).await {
            Err(MercatoError::Validation(violations)) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["lat", "lon"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_query() {
        let fx = fixture();
        let service = GeocodingService::new(fx.backend.clone(), fx.cache.clone());
        let query = GeocodeQuery {
            query: " ".to_string(),
            country: Filter::Any,
        };

        assert!(matches!(service.search(query, false).await, Err(MercatoError::Validation(_))));
    }
}
