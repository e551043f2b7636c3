//! In-process cache store for development and tests.

use super::CacheStore;
use async_trait::async_trait;
use mercato_core::MercatoResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Map size above which a write first sweeps out expired entries.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

/// A TTL-aware map.
///
/// Expired entries are dropped when read, and swept on write once the map
/// grows past the prune threshold.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    prune_threshold: usize,
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self {
            entries: Mutex::default(),
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
        }
    }
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the map size above which writes sweep expired entries.
    #[must_use]
    pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
        self.prune_threshold = threshold;
        self
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a live entry exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > now)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> MercatoResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> MercatoResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        if entries.len() >= self.prune_threshold {
            entries.retain(|_, (_, expires_at)| *expires_at > now);
        }
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> MercatoResult<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
