//! Redis-backed cache store.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use mercato_core::{MercatoError, MercatoResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Redis cache store over a deadpool connection pool.
///
/// Built without a pool it is disabled: reads miss and writes are dropped.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Creates a store that never holds anything (Redis disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds a pool from a Redis URL.
    pub fn connect(url: &str, pool_size: usize) -> MercatoResult<Self> {
        let mut cfg = deadpool_redis::Config::from_url(url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(pool_size));
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| MercatoError::Cache(format!("Failed to create Redis pool: {}", e)))?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Returns the underlying pool, if any.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool>> {
        self.pool.clone()
    }

    async fn get_conn(&self) -> MercatoResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| MercatoError::Cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(MercatoError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get(&self, key: &str) -> MercatoResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| MercatoError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> MercatoResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        // SET EX takes whole seconds; round sub-second TTLs up.
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| MercatoError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Stored key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> MercatoResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| MercatoError::Cache(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(deleted > 0)
    }
}
