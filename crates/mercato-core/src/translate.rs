//! Translation of failures into the external error envelope.
//!
//! An [`ErrorTranslator`] runs an ordered chain of [`ErrorHandler`]s; the
//! first handler that recognizes the failure produces the envelope:
//!
//! 1. [`ValidationHandler`]: field violations, 400.
//! 2. [`KnownFailureHandler`]: tagged domain failures, plus the phrase table
//!    for external failures.
//! 3. [`ClassifiedHandler`]: errors that already carry their status.
//! 4. [`FallbackHandler`]: everything else, 500 with a generic message.
//!
//! The phrase table only applies to [`MercatoError::External`]. It is a
//! best-effort compatibility shim for collaborators that report failures as
//! free text; errors raised inside the core are classified by variant.

use crate::{FieldError, MercatoError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Message returned for unclassified failures.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned for validation failures.
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation failed";

/// Phrases recognized in free-text external failures, with their status.
pub const KNOWN_FAILURE_PHRASES: &[(&str, u16)] = &[
    ("required fields", 400),
    ("Invalid userId", 401),
    ("not authorized", 403),
    ("already exists", 409),
    ("Failed to add contact", 500),
    ("Failed to update profile", 500),
    ("Failed to create proposal", 500),
];

/// Uniform error body returned to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// HTTP status classification.
    pub status_code: u16,
    /// Message text, or the payload of a pre-classified failure.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub message: serde_json::Value,
    /// When the failure was translated.
    pub timestamp: DateTime<Utc>,
    /// Request path, stamped by the HTTP layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Field-level violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Diagnostic detail, never set in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    /// Creates an envelope with a text message.
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self::with_payload(status_code, serde_json::Value::String(message.into()))
    }

    /// Creates an envelope whose message is an arbitrary payload.
    #[must_use]
    pub fn with_payload(status_code: u16, message: serde_json::Value) -> Self {
        Self {
            status_code,
            message,
            timestamp: Utc::now(),
            path: None,
            errors: None,
            stack: None,
        }
    }

    /// Sets the request path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets field-level violations.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Sets diagnostic detail.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Returns the message when it is plain text.
    #[must_use]
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_str()
    }
}

/// Context the translation runs in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationContext {
    /// Whether diagnostic detail must be withheld.
    pub production: bool,
}

/// One link of the translation chain.
pub trait ErrorHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produces an envelope if this handler recognizes the failure.
    fn handle(&self, error: &MercatoError, ctx: &TranslationContext) -> Option<ErrorEnvelope>;
}

/// Maps field violations to 400 with one entry per violation.
#[derive(Debug, Default)]
pub struct ValidationHandler;

impl ErrorHandler for ValidationHandler {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn handle(&self, error: &MercatoError, _ctx: &TranslationContext) -> Option<ErrorEnvelope> {
        match error {
            MercatoError::Validation(violations) => Some(
                ErrorEnvelope::new(400, VALIDATION_ERROR_MESSAGE).with_errors(violations.clone()),
            ),
            _ => None,
        }
    }
}

/// Maps recognized domain failures to their status, keeping the original text.
#[derive(Debug)]
pub struct KnownFailureHandler {
    phrases: &'static [(&'static str, u16)],
}

impl KnownFailureHandler {
    /// Creates a handler with a custom phrase table.
    #[must_use]
    pub const fn new(phrases: &'static [(&'static str, u16)]) -> Self {
        Self { phrases }
    }

    /// Looks up the status for a free-text failure message.
    #[must_use]
    pub fn match_phrase(&self, message: &str) -> Option<u16> {
        self.phrases
            .iter()
            .find(|(phrase, _)| message.contains(phrase))
            .map(|(_, status)| *status)
    }
}

impl Default for KnownFailureHandler {
    fn default() -> Self {
        Self::new(KNOWN_FAILURE_PHRASES)
    }
}

impl ErrorHandler for KnownFailureHandler {
    fn name(&self) -> &'static str {
        "known_failure"
    }

    fn handle(&self, error: &MercatoError, _ctx: &TranslationContext) -> Option<ErrorEnvelope> {
        match error {
            MercatoError::Domain(failure) => {
                Some(ErrorEnvelope::new(failure.status_code(), failure.to_string()))
            }
            MercatoError::External { service, message } => {
                let status = self.match_phrase(message)?;
                warn!(service = %service, status, "Classified external failure by message");
                Some(ErrorEnvelope::new(status, message.clone()))
            }
            _ => None,
        }
    }
}

/// Passes through errors that were deliberately raised with a status.
#[derive(Debug, Default)]
pub struct ClassifiedHandler;

impl ErrorHandler for ClassifiedHandler {
    fn name(&self) -> &'static str {
        "classified"
    }

    fn handle(&self, error: &MercatoError, _ctx: &TranslationContext) -> Option<ErrorEnvelope> {
        let envelope = match error {
            MercatoError::NotFound { .. } => ErrorEnvelope::new(404, error.to_string()),
            MercatoError::Unauthorized(message) => ErrorEnvelope::new(401, message.clone()),
            MercatoError::Forbidden(message) => ErrorEnvelope::new(403, message.clone()),
            MercatoError::Conflict(message) => ErrorEnvelope::new(409, message.clone()),
            MercatoError::Http { status, payload } => ErrorEnvelope::with_payload(*status, payload.clone()),
            _ => return None,
        };
        Some(envelope)
    }
}

/// Catches everything: 500 with a generic message.
#[derive(Debug, Default)]
pub struct FallbackHandler;

impl ErrorHandler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn handle(&self, error: &MercatoError, ctx: &TranslationContext) -> Option<ErrorEnvelope> {
        Some(fallback_envelope(error, ctx))
    }
}

fn fallback_envelope(error: &MercatoError, ctx: &TranslationContext) -> ErrorEnvelope {
    error!(error = %error, "Unclassified failure");
    let envelope = ErrorEnvelope::new(500, GENERIC_ERROR_MESSAGE);
    if ctx.production {
        envelope
    } else {
        envelope.with_stack(format!("{error:?}"))
    }
}

/// Ordered chain of handlers turning any failure into an envelope.
pub struct ErrorTranslator {
    handlers: Vec<Box<dyn ErrorHandler>>,
    ctx: TranslationContext,
}

impl ErrorTranslator {
    /// Creates the standard chain.
    #[must_use]
    pub fn new(production: bool) -> Self {
        Self::with_handlers(
            vec![
                Box::new(ValidationHandler),
                Box::new(KnownFailureHandler::default()),
                Box::new(ClassifiedHandler),
                Box::new(FallbackHandler),
            ],
            production,
        )
    }

    /// Creates a translator over a custom chain.
    #[must_use]
    pub fn with_handlers(handlers: Vec<Box<dyn ErrorHandler>>, production: bool) -> Self {
        Self {
            handlers,
            ctx: TranslationContext { production },
        }
    }

    /// Returns whether diagnostic detail is withheld.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        self.ctx.production
    }

    /// Translates a failure. The first handler that matches wins.
    #[must_use]
    pub fn translate(&self, error: &MercatoError) -> ErrorEnvelope {
        self.handlers
            .iter()
            .find_map(|handler| {
                let envelope = handler.handle(error, &self.ctx)?;
                tracing::debug!(handler = handler.name(), status = envelope.status_code, "Translated failure");
                Some(envelope)
            })
            .unwrap_or_else(|| fallback_envelope(error, &self.ctx))
    }
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for ErrorTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTranslator")
            .field("handlers", &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("production", &self.ctx.production)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainFailure;

    #[test]
    fn test_validation_failure_with_two_violations() {
        let translator = ErrorTranslator::new(true);
        let err = MercatoError::Validation(vec![
            FieldError::new("title", "Title is required"),
            FieldError::new("price", "Price must be positive"),
        ]);

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 400);
        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], FieldError::new("title", "Title is required"));
        assert_eq!(errors[1].field, "price");
    }

    #[test]
    fn test_validation_never_reaches_phrase_table() {
        // The message contains a known phrase, the field detail must still win.
        let translator = ErrorTranslator::new(false);
        let err = MercatoError::invalid_field("userId", "Invalid userId");

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.message_text(), Some(VALIDATION_ERROR_MESSAGE));
        assert!(envelope.errors.is_some());
    }

    #[test]
    fn test_invalid_user_id_maps_to_401() {
        let translator = ErrorTranslator::new(true);
        let envelope = translator.translate(&DomainFailure::InvalidUserId.into());

        assert_eq!(envelope.status_code, 401);
        assert_eq!(envelope.message_text(), Some("Invalid userId"));
        assert!(envelope.errors.is_none());
    }

    #[test]
    fn test_external_failure_matched_by_phrase() {
        let translator = ErrorTranslator::new(true);

        let err = MercatoError::external("backend", "Invalid userId");
        let envelope = translator.translate(&err);
        assert_eq!(envelope.status_code, 401);
        assert_eq!(envelope.message_text(), Some("Invalid userId"));

        let err = MercatoError::external("backend", "Please provide all required fields");
        assert_eq!(translator.translate(&err).status_code, 400);

        let err = MercatoError::external("backend", "Failed to add contact: duplicate row");
        let envelope = translator.translate(&err);
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message_text(), Some("Failed to add contact: duplicate row"));
    }

    #[test]
    fn test_unmatched_external_failure_is_unclassified() {
        let translator = ErrorTranslator::new(true);
        let err = MercatoError::external("backend", "connection reset by peer");

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message_text(), Some(GENERIC_ERROR_MESSAGE));
    }

    #[test]
    fn test_unclassified_failure_hides_detail_in_production() {
        let translator = ErrorTranslator::new(true);
        let err = MercatoError::Other(anyhow::anyhow!("db password is hunter2"));

        let envelope = translator.translate(&err);
        let body = serde_json::to_string(&envelope).unwrap();

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message_text(), Some(GENERIC_ERROR_MESSAGE));
        assert!(envelope.stack.is_none());
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn test_unclassified_failure_exposes_detail_outside_production() {
        let translator = ErrorTranslator::new(false);
        let err = MercatoError::internal("index out of range");

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message_text(), Some(GENERIC_ERROR_MESSAGE));
        assert!(envelope.stack.unwrap().contains("index out of range"));
    }

    #[test]
    fn test_pre_classified_not_found_passes_through() {
        let translator = ErrorTranslator::new(true);
        let err = MercatoError::not_found("Listing", "abc");

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.message_text(), Some("Listing not found: abc"));
    }

    #[test]
    fn test_pre_classified_payload_is_unchanged() {
        let translator = ErrorTranslator::new(true);
        let payload = serde_json::json!({"error": "Not Found", "resource": "proposal"});
        let err = MercatoError::Http {
            status: 404,
            payload: payload.clone(),
        };

        let envelope = translator.translate(&err);

        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.message, payload);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = ErrorEnvelope::new(400, VALIDATION_ERROR_MESSAGE)
            .with_path("/api/v1/listings")
            .with_errors(vec![FieldError::new("limit", "out of range")]);

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["path"], "/api/v1/listings");
        assert_eq!(json["errors"][0]["field"], "limit");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        assert!(json.get("stack").is_none());
    }

    #[test]
    fn test_custom_chain_falls_back_when_nothing_matches() {
        let translator = ErrorTranslator::with_handlers(vec![Box::new(ValidationHandler)], true);
        let envelope = translator.translate(&MercatoError::conflict("taken"));
        assert_eq!(envelope.status_code, 500);
    }
}
