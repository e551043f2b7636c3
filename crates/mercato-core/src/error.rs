//! Unified error taxonomy for all layers of the application.
//!
//! Failures are classified where they happen: each operation returns one of
//! the closed set of [`MercatoError`] variants. The only message-based
//! classification left is for [`MercatoError::External`], see
//! [`crate::translate`].

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Field-level violation reported by request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field path (`address.city`, `items[0].name`).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Recognized marketplace failures raised by the services themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainFailure {
    /// A request lacked fields the operation cannot proceed without.
    #[error("Missing required fields: {0}")]
    MissingRequiredFields(String),

    /// The caller's user id does not identify a usable account.
    #[error("Invalid userId")]
    InvalidUserId,

    /// The system-of-record refused to store a contact.
    #[error("Failed to add contact")]
    AddContactFailed,

    /// The system-of-record refused a profile update.
    #[error("Failed to update profile")]
    UpdateProfileFailed,

    /// The system-of-record refused to store a proposal.
    #[error("Failed to create proposal")]
    CreateProposalFailed,

    /// A proposal status change that the lifecycle does not allow.
    #[error("Proposal cannot move from {from} to {to}")]
    InvalidProposalTransition { from: String, to: String },
}

impl DomainFailure {
    /// Returns the HTTP status associated with this failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingRequiredFields(_) => 400,
            Self::InvalidUserId => 401,
            Self::InvalidProposalTransition { .. } => 409,
            Self::AddContactFailed | Self::UpdateProfileFailed | Self::CreateProposalFailed => 500,
        }
    }
}

/// Unified error type for Mercato.
#[derive(Error, Debug)]
pub enum MercatoError {
    // ============ Caller Errors ============
    /// Request validation failed with one entry per violated field.
    #[error("Validation failed: {}", format_violations(.0))]
    Validation(Vec<FieldError>),

    /// Recognized domain failure.
    #[error(transparent)]
    Domain(#[from] DomainFailure),

    // ============ Pre-classified Errors ============
    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Unauthorized access.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden access.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict with the current state of a resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failure that already carries its intended HTTP status and payload.
    #[error("HTTP {status}: {payload}")]
    Http {
        status: u16,
        payload: serde_json::Value,
    },

    // ============ Infrastructure Errors ============
    /// Failure reported by a collaborator the core does not control.
    #[error("External service error: {service} - {message}")]
    External { service: String, message: String },

    /// Cache store failure. Absorbed by the cache layer.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_violations(violations: &[FieldError]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl MercatoError {
    /// Returns the status this error declares for itself.
    ///
    /// External and unclassified failures report 500 here; the
    /// [`crate::ErrorTranslator`] may still map an external failure to a
    /// more specific status through its phrase table.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Domain(failure) => failure.status_code(),
            Self::NotFound { .. } => 404,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Http { status, .. } => *status,
            Self::External { .. }
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Timeout(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error for a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an error reported by an external collaborator.
    #[must_use]
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for MercatoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(MercatoError::not_found("Listing", 1).status_code(), 404);
        assert_eq!(MercatoError::invalid_field("title", "required").status_code(), 400);
        assert_eq!(MercatoError::unauthorized("no session").status_code(), 401);
        assert_eq!(MercatoError::forbidden("not owner").status_code(), 403);
        assert_eq!(MercatoError::conflict("duplicate").status_code(), 409);
        assert_eq!(MercatoError::Cache("down".to_string()).status_code(), 500);
        assert_eq!(MercatoError::external("backend", "boom").status_code(), 500);
    }

    #[test]
    fn test_domain_failure_status_codes() {
        assert_eq!(DomainFailure::MissingRequiredFields("title".into()).status_code(), 400);
        assert_eq!(DomainFailure::InvalidUserId.status_code(), 401);
        assert_eq!(DomainFailure::AddContactFailed.status_code(), 500);
        assert_eq!(
            MercatoError::from(DomainFailure::InvalidProposalTransition {
                from: "accepted".into(),
                to: "rejected".into(),
            })
            .status_code(),
            409
        );
    }

    #[test]
    fn test_domain_failure_messages_keep_original_text() {
        assert_eq!(DomainFailure::InvalidUserId.to_string(), "Invalid userId");
        assert_eq!(MercatoError::from(DomainFailure::AddContactFailed).to_string(), "Failed to add contact");
    }

    #[test]
    fn test_http_error_declares_its_status() {
        let err = MercatoError::Http {
            status: 418,
            payload: serde_json::json!({"reason": "teapot"}),
        };
        assert_eq!(err.status_code(), 418);
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = MercatoError::Validation(vec![
            FieldError::new("title", "too short"),
            FieldError::new("price", "must be positive"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: title: too short; price: must be positive");
    }
}
