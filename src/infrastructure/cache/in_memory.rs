//! In-memory cache backend using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::{glob_to_regex, Cache};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

#[derive(Debug, Clone)]
struct StoredValue {
    data: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-local backend for development, tests and single-instance deployments
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, StoredValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(key).await.map(|value| value.data))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let stored = StoredValue {
            data: value.to_string(),
            ttl,
        };

        self.cache.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = glob_to_regex(pattern)?;

        self.cache.run_pending_tasks().await;

        let keys_to_delete: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| regex.is_match(key.as_str()))
            .map(|(key, _)| key.to_string())
            .collect();

        let mut deleted = 0;

        for key in keys_to_delete {
            if self.cache.remove(&key).await.is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = glob_to_regex(pattern)?;

        self.cache.run_pending_tasks().await;

        Ok(self
            .cache
            .iter()
            .filter(|(key, _)| regex.is_match(key.as_str()))
            .count())
    }
}
