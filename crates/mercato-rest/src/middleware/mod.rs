//! HTTP middleware.

mod envelope;
mod logging;

pub use envelope::*;
pub use logging::*;
