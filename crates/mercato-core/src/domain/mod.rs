//! Marketplace records served through the cache layer.
//!
//! These are the value shapes the system-of-record returns and the cache
//! stores. They carry no behavior beyond small helpers.

pub mod contact;
pub mod filter;
pub mod geocode;
pub mod listing;
pub mod profile;
pub mod proposal;
pub mod user;

pub use contact::*;
pub use filter::*;
pub use geocode::*;
pub use listing::*;
pub use profile::*;
pub use proposal::*;
pub use user::*;
