use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{LmsError, Result};

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 带单条 TTL 的缓存值
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 每条记录按自身 ttl 过期
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _now: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        if config.cache.memory.max_capacity == 0 {
            return Err(LmsError::cache_connection(
                "cache.memory.max_capacity must be greater than 0",
            ));
        }
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!("MokaCacheWrapper initialized with max capacity: {}", max_capacity);
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("user:1".to_string(), "budi".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:1").await,
            CacheResult::Found("budi".to_string())
        );

        cache.remove("user:1").await;
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }
}
