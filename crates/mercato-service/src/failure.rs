//! Mapping of backend write failures onto known domain failures.

use mercato_core::{DomainFailure, MercatoError};
use tracing::error;

/// Keeps failures the caller can act on and replaces the rest with `failure`.
///
/// Validation, lookup and conflict errors pass through unchanged; anything
/// else from the backend is logged and reported as the domain failure.
pub(crate) fn or_domain_failure(err: MercatoError, failure: DomainFailure) -> MercatoError {
    match err {
        MercatoError::Validation(_)
        | MercatoError::Domain(_)
        | MercatoError::NotFound { .. }
        | MercatoError::Conflict(_)
        | MercatoError::Forbidden(_)
        | MercatoError::Unauthorized(_) => err,
        other => {
            error!("{}: {}", failure, other);
            MercatoError::Domain(failure)
        }
    }
}
