//! Cache domain - Response fingerprints, entries and the backend abstraction

mod entry;
mod fingerprint;
mod repository;
mod stats;

pub use entry::{CacheEntry, CachedResponse};
pub use fingerprint::{ConversationInputs, Fingerprint, FingerprintGenerator};
pub use repository::{Cache, CacheExt};
pub use stats::CacheStats;

pub(crate) use repository::glob_to_regex;

#[cfg(test)]
pub use repository::mock::MockCache;
