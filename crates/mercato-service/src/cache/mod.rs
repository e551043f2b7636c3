//! Cache-aside layer.
//!
//! A small stack: a [`CacheStore`] (Redis or in-memory) holds JSON text, the
//! [`CacheAside`] helper turns it into typed reads and writes that never fail,
//! and [`MarketplaceCache`] binds one helper per marketplace domain with its
//! key scheme and TTL.

mod aside;
pub mod cache_keys;
mod domain;
mod memory_store;
pub mod metrics;
mod redis_store;
mod store;

pub use aside::{CacheAside, DEFAULT_OPERATION_TIMEOUT, DEFAULT_TTL};
pub use cache_keys::CacheKey;
pub use domain::*;
pub use memory_store::{InMemoryCacheStore, DEFAULT_PRUNE_THRESHOLD};
pub use metrics::{register_metrics, CacheMetrics, ReadOutcome};
pub use redis_store::{RedisCacheStore, RedisCacheStoreParameters};
pub use store::CacheStore;

#[cfg(test)]
pub use store::MockCacheStore;
