//! Result type aliases for Mercato.

use crate::MercatoError;

/// A specialized `Result` type for Mercato operations.
pub type MercatoResult<T> = Result<T, MercatoError>;
