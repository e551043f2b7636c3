//! Final rendering of error envelopes.

use crate::responses::{envelope_response, ErrorSource};
use crate::state::AppState;
use mercato_core::MercatoError;
use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};

/// Re-renders error responses with the configured translator and stamps the
/// request path on the envelope.
pub async fn error_envelope_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path().to_string(), |uri| uri.path().to_string());

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorSource>() {
        Some(ErrorSource(error)) => {
            let envelope = state.translator.translate(&error).with_path(path);
            envelope_response(envelope)
        }
        // Error statuses produced by the router itself, e.g. 405 on a known path.
        None if response.status().is_client_error() || response.status().is_server_error() => {
            let status = response.status();
            let error = MercatoError::Http {
                status: status.as_u16(),
                payload: serde_json::Value::String(status.canonical_reason().unwrap_or("Error").to_string()),
            };
            let allow = response.headers().get(header::ALLOW).cloned();
            let envelope = state.translator.translate(&error).with_path(path);
            let mut rendered = envelope_response(envelope);
            if let Some(allow) = allow {
                rendered.headers_mut().insert(header::ALLOW, allow);
            }
            rendered
        }
        None => response,
    }
}
