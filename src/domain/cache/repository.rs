//! Cache backend trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Key-value backend with TTL support
///
/// Values are JSON strings so the trait stays dyn-compatible; use [`CacheExt`] for
/// typed access. Implementations report failures as errors and leave degradation
/// to the caller.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Short backend identifier for logs
    fn backend_name(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with a TTL
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes a value from the cache
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Deletes every key matching a glob pattern (`*` wildcard)
    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError>;

    /// Returns approximate number of entries in the cache
    async fn size(&self) -> Result<usize, DomainError>;

    /// Counts keys matching a glob pattern (`*` wildcard)
    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache(format!("Failed to deserialize cache value: {}", e))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a typed value in the cache with a TTL
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data, ttl).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}

/// Translates a `*` glob into an anchored regex, escaping everything else
pub(crate) fn glob_to_regex(pattern: &str) -> Result<regex::Regex, DomainError> {
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    let source = format!("^{}$", escaped.join(".*"));

    regex::Regex::new(&source).map_err(|e| DomainError::cache(format!("Invalid pattern: {}", e)))
}
