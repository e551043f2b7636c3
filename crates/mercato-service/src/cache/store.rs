//! Key-value store boundary used by the cache-aside layer.

use async_trait::async_trait;
use mercato_core::MercatoResult;
use shaku::Interface;
use std::time::Duration;

/// A string key-value store with per-entry expiry.
///
/// Values are opaque JSON text; the cache-aside layer owns serialization.
/// Implementations report failures as `MercatoError::Cache` and leave it to
/// the caller to absorb them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Returns the stored value, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> MercatoResult<Option<String>>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> MercatoResult<()>;

    /// Deletes a key. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> MercatoResult<bool>;

    /// Returns false for a store that never holds anything.
    fn is_enabled(&self) -> bool;
}
