//! Path parameter parsing.

use crate::responses::AppError;
use mercato_core::MercatoError;

/// Parses a path identifier, reporting a malformed one as a field violation.
pub fn parse_id<T, E>(field: &str, raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<T, AppError> {
    parse(raw).map_err(|_| AppError(MercatoError::invalid_field(field, format!("Invalid {field}: {raw}"))))
}
