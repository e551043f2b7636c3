//! Custom Axum extractors.

mod bypass;
mod pagination;
mod path;
mod query;
mod validated;

pub use bypass::*;
pub use pagination::*;
pub use path::*;
pub use query::*;
pub use validated::*;
