//! Fault-tolerant response cache
//!
//! Wraps an optional [`Cache`] backend. The backend is probed once at startup; when it
//! is missing every operation is a no-op that reports a miss. When present, each call
//! is bounded by the operation timeout and attempted exactly once. Failures become
//! misses or no-ops and are logged, never returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheEntry, CacheExt, CachedResponse, Fingerprint, FingerprintGenerator};
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheFactory};

/// Response store keyed by [`Fingerprint`]
#[derive(Debug, Clone)]
pub struct ResponseCache {
    backend: Option<Arc<dyn Cache>>,
    namespace: String,
    default_ttl: Duration,
    operation_timeout: Duration,
    generator: FingerprintGenerator,
}

impl ResponseCache {
    /// Wraps an already probed backend; `None` disables caching
    pub fn new(backend: Option<Arc<dyn Cache>>, config: &CacheConfig) -> Self {
        Self {
            backend,
            namespace: config.namespace.clone(),
            default_ttl: config.default_ttl(),
            operation_timeout: config.operation_timeout(),
            generator: FingerprintGenerator::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, &CacheConfig::disabled())
    }

    /// Builds and probes the configured backend
    pub async fn connect(config: &CacheConfig) -> Self {
        let backend = CacheFactory::new().connect(config).await;
        Self::new(backend, config)
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|backend| backend.backend_name())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Whether the backend answers a ping right now
    pub async fn ping(&self) -> bool {
        match &self.backend {
            Some(backend) => self.bounded("ping", backend.ping()).await.is_some(),
            None => false,
        }
    }

    /// Live entry for `fingerprint`, or `None` on miss, expiry or backend failure
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let backend = self.backend.as_ref()?;
        let key = fingerprint.storage_key(&self.namespace);

        let stored: Option<Option<CacheEntry>> = self.bounded("get", backend.get(&key)).await;
        let entry = stored.flatten()?;

        if entry.is_expired() {
            debug!(fingerprint = %fingerprint, "Discarding expired cache entry");
            self.bounded("delete", backend.delete(&key)).await;
            return None;
        }

        Some(entry)
    }

    /// Stores `payload` for `ttl`, or the default TTL when `None`.
    ///
    /// Returns whether the backend accepted the write.
    pub async fn set(
        &self,
        fingerprint: &Fingerprint,
        payload: CachedResponse,
        ttl: Option<Duration>,
    ) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };

        let ttl = ttl.unwrap_or(self.default_ttl);

        if ttl.is_zero() {
            debug!(fingerprint = %fingerprint, "Skipping cache write with zero TTL");
            return false;
        }

        let key = fingerprint.storage_key(&self.namespace);
        let entry = CacheEntry::new(fingerprint.digest(), payload, ttl);

        self.bounded("set", backend.set(&key, &entry, ttl))
            .await
            .is_some()
    }

    /// Removes one entry; `true` if it existed
    pub async fn invalidate(&self, fingerprint: &Fingerprint) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };

        let key = fingerprint.storage_key(&self.namespace);
        self.bounded("delete", backend.delete(&key))
            .await
            .unwrap_or(false)
    }

    /// Removes every entry derived under `scope`, returning how many were removed
    pub async fn invalidate_scope(&self, scope: &str) -> usize {
        let pattern = self.generator.scope_pattern(&self.namespace, scope);
        self.delete_pattern(&pattern).await
    }

    /// Removes every entry under the namespace
    pub async fn clear(&self) -> usize {
        let pattern = self.namespace_pattern();
        self.delete_pattern(&pattern).await
    }

    /// Responses stored under the namespace, when the backend is reachable
    pub async fn entries(&self) -> Option<usize> {
        let backend = self.backend.as_ref()?;
        let pattern = self.namespace_pattern();

        self.bounded("count_pattern", backend.count_pattern(&pattern))
            .await
    }

    fn namespace_pattern(&self) -> String {
        format!("{}:*", self.namespace)
    }

    async fn delete_pattern(&self, pattern: &str) -> usize {
        let Some(backend) = &self.backend else {
            return 0;
        };

        self.bounded("delete_pattern", backend.delete_pattern(pattern))
            .await
            .unwrap_or(0)
    }

    /// Runs one backend call under the operation timeout; failures are logged and become `None`
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "Response cache call failed, treating as miss");
                None
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Response cache call timed out, treating as miss"
                );
                None
            }
        }
    }
}
