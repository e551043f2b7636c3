//! Dependency injection module using Shaku.

use mercato_config::RedisConfig;
use mercato_core::{MercatoError, MercatoResult};
use mercato_service::{CacheStore, RedisCacheStore, RedisCacheStoreParameters};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

// Cache module: the shared store every domain cache writes through.
module! {
    pub CacheModule {
        components = [
            RedisCacheStore,
        ],
        providers = [],
    }
}

/// Builds the cache module.
///
/// With Redis disabled the store has no pool and every read misses.
pub fn build_cache_module(redis_config: &RedisConfig) -> MercatoResult<Arc<CacheModule>> {
    let pool = if redis_config.enabled {
        let mut cfg = deadpool_redis::Config::from_url(&redis_config.url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(redis_config.pool_size));
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| MercatoError::Cache(format!("Failed to create Redis pool: {}", e)))?;
        info!("Redis cache pool created for {}", redis_config.url);
        Some(Arc::new(pool))
    } else {
        info!("Redis disabled; cache reads always miss");
        None
    };

    let module = CacheModule::builder()
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters { pool })
        .build();

    Ok(Arc::new(module))
}

/// Resolves the cache store from the module.
pub fn cache_store(module: &CacheModule) -> Arc<dyn CacheStore> {
    module.resolve()
}
