//! Generic cache-aside helper.
//!
//! Reads and writes typed values through a [`CacheStore`]. Nothing here ever
//! fails the caller: store errors, timeouts and unreadable entries are logged
//! and reported as a miss (reads) or a no-op (writes and deletes).

use super::{CacheKey, CacheMetrics, CacheStore};
use mercato_core::{MercatoError, MercatoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default TTL for cached entries (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default bound for a single store call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(500);

/// Typed cache-aside operations over a store.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    default_ttl: Duration,
    operation_timeout: Duration,
}

impl CacheAside {
    /// Creates a helper with the default TTL and timeout.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            default_ttl: DEFAULT_TTL,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Reads a value. Absent, unreadable and failed reads are all `None`.
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let raw = self
            .bounded("get", key, self.store.get(key.as_str()))
            .await
            .flatten()?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    /// Writes a value with the default TTL.
    pub async fn set_cache<T: Serialize + Sync>(&self, key: &CacheKey, value: &T) -> bool {
        self.set_cache_with_ttl(key, value, self.default_ttl).await
    }

    /// Writes a value with an explicit TTL. Returns true if the store accepted it.
    ///
    /// A zero TTL means the entry is already expired: any existing entry is
    /// deleted and nothing is written.
    pub async fn set_cache_with_ttl<T: Serialize + Sync>(&self, key: &CacheKey, value: &T, ttl: Duration) -> bool {
        if ttl.is_zero() {
            debug!("Zero TTL for '{}', removing instead of writing", key);
            self.invalidate_cache(key).await;
            return false;
        }

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize value for '{}': {}", key, e);
                return false;
            }
        };

        let written = self
            .bounded("set", key, self.store.set(key.as_str(), &json, ttl))
            .await
            .is_some();
        if written {
            debug!("Cached '{}' for {}s", key, ttl.as_secs());
        }
        written
    }

    /// Deletes a key. Deleting an absent key is a no-op.
    pub async fn invalidate_cache(&self, key: &CacheKey) {
        if let Some(existed) = self.bounded("delete", key, self.store.delete(key.as_str())).await {
            debug!("Invalidated '{}' (existed: {})", key, existed);
        }
    }

    /// Runs a store call under the operation timeout, absorbing failures.
    async fn bounded<T, F>(&self, operation: &'static str, key: &CacheKey, call: F) -> Option<T>
    where
        F: Future<Output = MercatoResult<T>>,
    {
        let result = match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MercatoError::Timeout(format!(
                "cache {operation} exceeded {}ms",
                self.operation_timeout.as_millis()
            ))),
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache {} failed for '{}': {}", operation, key, e);
                CacheMetrics::store_error(operation);
                None
            }
        }
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("enabled", &self.store.is_enabled())
            .field("default_ttl", &self.default_ttl)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{cache_keys, InMemoryCacheStore, MockCacheStore};
    use async_trait::async_trait;
    use mercato_core::UserId;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        qty: u32,
    }

    fn item() -> Item {
        Item {
            name: "lamp".to_string(),
            qty: 2,
        }
    }

    fn key() -> CacheKey {
        cache_keys::user_by_id(UserId::new())
    }

    /// Store whose every call takes longer than any sane timeout.
    struct SlowStore;

    #[async_trait]
    impl CacheStore for SlowStore {
        async fn get(&self, _key: &str) -> MercatoResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some("{\"name\":\"lamp\",\"qty\":2}".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> MercatoResult<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn delete(&self, _key: &str) -> MercatoResult<bool> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let cache = CacheAside::new(Arc::new(InMemoryCacheStore::new()));
        let key = key();

        assert!(cache.set_cache(&key, &item()).await);
        assert_eq!(cache.get_from_cache::<Item>(&key).await, Some(item()));
    }

    #[tokio::test]
    async fn test_absent_key_is_none() {
        let cache = CacheAside::new(Arc::new(InMemoryCacheStore::new()));
        assert_eq!(cache.get_from_cache::<Item>(&key()).await, None);
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let cache = CacheAside::new(Arc::new(InMemoryCacheStore::new()));
        let key = key();
        cache.set_cache(&key, &item()).await;

        cache.invalidate_cache(&key).await;
        cache.invalidate_cache(&key).await;

        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_leaves_nothing_behind() {
        let cache = CacheAside::new(Arc::new(InMemoryCacheStore::new()));
        let key = key();
        cache.set_cache(&key, &item()).await;

        let written = cache.set_cache_with_ttl(&key, &item(), Duration::ZERO).await;

        assert!(!written);
        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = CacheAside::new(store.clone());
        let key = key();
        store
            .set(key.as_str(), "{not json", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_miss() {
        let store = Arc::new(InMemoryCacheStore::new());
        let cache = CacheAside::new(store.clone());
        let key = key();
        store
            .set(key.as_str(), "[1,2,3]", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
    }

    #[tokio::test]
    async fn test_store_errors_are_absorbed() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .returning(|_| Err(MercatoError::Cache("connection refused".to_string())));
        store
            .expect_set()
            .returning(|_, _, _| Err(MercatoError::Cache("connection refused".to_string())));
        store
            .expect_delete()
            .returning(|_| Err(MercatoError::Cache("connection refused".to_string())));
        let cache = CacheAside::new(Arc::new(store));
        let key = key();

        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
        assert!(!cache.set_cache(&key, &item()).await);
        cache.invalidate_cache(&key).await;
    }

    #[tokio::test]
    async fn test_ttl_is_passed_to_store() {
        let mut store = MockCacheStore::new();
        store
            .expect_set()
            .withf(|_, value, ttl| value.contains("lamp") && *ttl == Duration::from_secs(90))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let cache = CacheAside::new(Arc::new(store));

        assert!(cache.set_cache_with_ttl(&key(), &item(), Duration::from_secs(90)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out() {
        let cache = CacheAside::new(Arc::new(SlowStore)).with_operation_timeout(Duration::from_millis(50));
        let key = key();

        assert_eq!(cache.get_from_cache::<Item>(&key).await, None);
        assert!(!cache.set_cache(&key, &item()).await);
        cache.invalidate_cache(&key).await;
    }
}
