//! # Mercato REST
//!
//! REST API layer using Axum. Exposes the cached marketplace reads and the
//! mutations that invalidate them, and renders every failure as the uniform
//! error envelope.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
