//! # Mercato Repository
//!
//! Boundary to the system-of-record:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ListingRepository>, Arc<dyn GeocodingProvider>, ...
//! system-of-record (managed auth/data backend, geocoding API)
//! ```
//!
//! The services only ever reach these traits on a cache miss or bypass.
//! [`InMemoryMarketplace`] implements every trait and serves as the
//! development backend and as the test double.

pub mod memory;
pub mod traits;

pub use memory::InMemoryMarketplace;
pub use traits::*;
