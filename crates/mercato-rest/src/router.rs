//! Main application router.

use crate::{
    controllers::{
        geocode_controller, health_controller, listing_controller, profile_controller, proposal_controller,
        user_controller, username_controller,
    },
    middleware::{error_envelope_middleware, logging_middleware},
    openapi::ApiDoc,
    responses::AppError,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use mercato_config::ServerConfig;
use mercato_core::MercatoError;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Answers unmatched `/api/v1` paths with a 404 envelope.
async fn route_not_found() -> AppError {
    AppError(MercatoError::Http {
        status: 404,
        payload: serde_json::Value::String("Route not found".to_string()),
    })
}

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new()
        .nest("/users", user_controller::router())
        .nest("/usernames", username_controller::router())
        .nest("/profiles", profile_controller::router())
        .nest("/listings", listing_controller::router())
        .nest("/proposals", proposal_controller::router())
        .nest("/geocode", geocode_controller::router())
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), error_envelope_middleware))
        .with_state(state.clone());

    let router = Router::new()
        .merge(health_controller::router().with_state(state))
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Mercato API v1"
}
