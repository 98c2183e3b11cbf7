//! Redis cache backend

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Upper bound for establishing the initial connection
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed response store
///
/// TTLs are enforced natively with `SET EX`; scoped deletion walks keys with
/// `SCAN MATCH` rather than `KEYS`. The connection manager reconnects on its own
/// after the backend comes back.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to Redis, failing if the connection cannot be made in time
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection =
            tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
                .await
                .map_err(|_| {
                    DomainError::cache(format!(
                        "Timed out connecting to Redis after {}ms",
                        config.connection_timeout.as_millis()
                    ))
                })?
                .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut found = Vec::new();

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(500)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            found.extend(keys);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl Cache for RedisCache {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        // SET EX rejects zero; sub-second TTLs round up
        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(&prefixed_key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let keys = self.scan_keys(&self.prefix_key(pattern)).await?;
        let mut conn = self.connection.clone();
        let mut total_deleted = 0usize;

        for batch in keys.chunks(500) {
            let deleted: i64 = conn
                .del(batch)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;
            total_deleted += deleted.max(0) as usize;
        }

        Ok(total_deleted)
    }

    async fn size(&self) -> Result<usize, DomainError> {
        match &self.config.key_prefix {
            Some(_) => Ok(self.scan_keys(&self.prefix_key("*")).await?.len()),
            None => {
                let mut conn = self.connection.clone();
                let size: usize = redis::cmd("DBSIZE")
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| {
                        DomainError::cache(format!("Failed to get database size: {}", e))
                    })?;
                Ok(size)
            }
        }
    }

    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        Ok(self.scan_keys(&self.prefix_key(pattern)).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("portal-knowledge-test")
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));

        cache.delete("key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_pattern() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let ttl = Duration::from_secs(60);

        cache.set_raw("chat:scope-a:1", "1", ttl).await.unwrap();
        cache.set_raw("chat:scope-a:2", "2", ttl).await.unwrap();
        cache.set_raw("chat:scope-b:1", "3", ttl).await.unwrap();

        let deleted = cache.delete_pattern("chat:scope-a:*").await.unwrap();
        assert_eq!(deleted, 2);

        cache.delete_pattern("chat:*").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_count_pattern() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let ttl = Duration::from_secs(60);

        cache.set_raw("chat:count:1", "1", ttl).await.unwrap();
        cache.set_raw("session:count:1", "s", ttl).await.unwrap();

        assert_eq!(cache.count_pattern("chat:count:*").await.unwrap(), 1);

        cache.delete_pattern("chat:count:*").await.unwrap();
        cache.delete_pattern("session:count:*").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ping() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        assert!(cache.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let result = RedisCache::new(RedisCacheConfig::new("not-a-redis-url")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = RedisCacheConfig::new("redis://localhost")
            .with_key_prefix("myapp")
            .with_connection_timeout(Duration::from_millis(500));

        assert_eq!(config.key_prefix, Some("myapp".to_string()));
        assert_eq!(config.connection_timeout, Duration::from_millis(500));
    }
}
