//! API response types.

use mercato_core::{ErrorEnvelope, ErrorTranslator, MercatoError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Standard API response wrapper for successful calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self { success: true, data }
    }
}

/// The failure behind an error response, left for the envelope middleware.
#[derive(Debug, Clone)]
pub struct ErrorSource(pub Arc<MercatoError>);

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub MercatoError);

impl From<MercatoError> for AppError {
    fn from(err: MercatoError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    /// Renders a production-safe envelope and attaches the failure so the
    /// envelope middleware can re-render it with the configured translator
    /// and the request path.
    fn into_response(self) -> Response {
        let envelope = ErrorTranslator::new(true).translate(&self.0);
        let mut response = envelope_response(envelope);
        response.extensions_mut().insert(ErrorSource(Arc::new(self.0)));
        response
    }
}

/// Renders an envelope with its status code.
pub fn envelope_response(envelope: ErrorEnvelope) -> Response {
    let status = StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Helper to create a no content (204) response.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
