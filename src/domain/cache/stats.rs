//! Cache statistics snapshot

use serde::Serialize;

/// Process-wide cache counters, reset on restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
    /// hits / (hits + misses), zero before any lookup
    pub hit_rate: f64,
    pub enabled: bool,
    /// Entries currently held by the backend, when it can tell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}
