//! Response cache front with process-wide statistics

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::domain::cache::{CacheStats, CachedResponse, ConversationInputs, Fingerprint, FingerprintGenerator};

use super::ResponseCache;

/// Fingerprints conversation inputs, delegates to [`ResponseCache`] and counts
/// hits, misses, writes and invalidations
#[derive(Debug)]
pub struct CacheGovernor {
    cache: ResponseCache,
    generator: FingerprintGenerator,
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheGovernor {
    pub fn new(cache: ResponseCache) -> Self {
        Self {
            cache,
            generator: FingerprintGenerator::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    pub fn fingerprint(&self, inputs: &ConversationInputs) -> Fingerprint {
        self.generator.fingerprint(inputs)
    }

    /// Cached answer for `inputs`; a disabled or failing cache always misses
    pub async fn lookup(&self, inputs: &ConversationInputs) -> Option<CachedResponse> {
        let fingerprint = self.fingerprint(inputs);

        match self.cache.get(&fingerprint).await {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %fingerprint, "Response cache hit");
                Some(entry.payload)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %fingerprint, "Response cache miss");
                None
            }
        }
    }

    /// Stores with the default TTL
    pub async fn store(&self, inputs: &ConversationInputs, response: CachedResponse) -> bool {
        self.write(inputs, response, None).await
    }

    pub async fn store_with_ttl(
        &self,
        inputs: &ConversationInputs,
        response: CachedResponse,
        ttl: Duration,
    ) -> bool {
        self.write(inputs, response, Some(ttl)).await
    }

    pub async fn invalidate(&self, inputs: &ConversationInputs) -> bool {
        let removed = self.cache.invalidate(&self.fingerprint(inputs)).await;

        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Drops every entry derived under `scope`
    pub async fn invalidate_scope(&self, scope: &str) -> usize {
        let removed = self.cache.invalidate_scope(scope).await;
        self.invalidations.fetch_add(removed as u64, Ordering::Relaxed);
        debug!(scope, removed, "Invalidated response cache scope");
        removed
    }

    /// Operational reset of the whole namespace
    pub async fn clear_all(&self) -> usize {
        let removed = self.cache.clear().await;
        self.invalidations.fetch_add(removed as u64, Ordering::Relaxed);
        debug!(removed, "Cleared response cache");
        removed
    }

    /// Cache-aside: returns the cached answer or runs `compute` and stores its result.
    ///
    /// Cache failures only ever cost a recomputation; errors from `compute` are returned
    /// unchanged and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        inputs: &ConversationInputs,
        compute: F,
    ) -> Result<CachedResponse, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResponse, E>>,
    {
        if let Some(cached) = self.lookup(inputs).await {
            return Ok(cached);
        }

        let response = compute().await?;
        self.store(inputs, response.clone()).await;
        Ok(response)
    }

    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            enabled: self.cache.is_enabled(),
            entries: self.cache.entries().await,
        }
    }

    async fn write(
        &self,
        inputs: &ConversationInputs,
        response: CachedResponse,
        ttl: Option<Duration>,
    ) -> bool {
        let stored = self.cache.set(&self.fingerprint(inputs), response, ttl).await;

        if stored {
            self.sets.fetch_add(1, Ordering::Relaxed);
        }
        stored
    }
}
