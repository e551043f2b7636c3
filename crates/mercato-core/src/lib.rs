//! # Mercato Core
//!
//! Core types shared by every layer of the Mercato marketplace backend:
//! typed identifiers, pagination, domain records, the error taxonomy and the
//! translation of failures into the external error envelope.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod translate;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use translate::*;
pub use validation::*;
