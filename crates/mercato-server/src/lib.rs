//! # Mercato Server Library
//!
//! Wiring for the Mercato server: the cache store module, logging and
//! metrics setup, and the demo data the in-memory backend starts with.

pub mod di;
pub mod seed;
pub mod startup;
pub mod telemetry;
