//! Health endpoints.
//!
//! The system-of-record is always consulted on a cache miss, so a disabled or
//! unreachable cache degrades latency but never availability.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Service health, including whether reads can be served from the cache.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when every read goes to the system-of-record.
    pub status: String,
    /// `enabled` or `disabled`.
    pub cache: String,
    pub version: String,
}

impl HealthResponse {
    fn for_cache(cache_enabled: bool) -> Self {
        let (status, cache) = if cache_enabled {
            ("healthy", "enabled")
        } else {
            ("degraded", "disabled")
        };
        Self {
            status: status.to_string(),
            cache: cache.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/live", get(liveness_check))
}

/// Reports service health and cache store state.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is serving requests", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::for_cache(state.cache.is_enabled()))
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive")
    )
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cache_is_degraded() {
        let response = HealthResponse::for_cache(false);
        assert_eq!(response.status, "degraded");
        assert_eq!(response.cache, "disabled");

        let response = HealthResponse::for_cache(true);
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache, "enabled");
    }
}
