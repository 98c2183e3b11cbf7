//! Infrastructure services

mod cache_governor;
mod response_cache;

pub use cache_governor::CacheGovernor;
pub use response_cache::ResponseCache;
