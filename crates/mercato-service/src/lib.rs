//! # Mercato Service
//!
//! Cache-aside data access for the marketplace. Each service reads through
//! its domain cache, falls back to the system of record on a miss, and
//! invalidates every key a mutation can affect.

pub mod cache;
pub mod dto;
mod failure;
pub mod contact_service;
pub mod favorite_service;
pub mod geocoding_service;
pub mod listing_service;
pub mod profile_service;
pub mod proposal_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::*;
pub use contact_service::*;
pub use dto::*;
pub use favorite_service::*;
pub use geocoding_service::*;
pub use listing_service::*;
pub use profile_service::*;
pub use proposal_service::*;
pub use user_service::*;
