//! Cache infrastructure - Backend implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheBackendType, CacheConfig, CacheFactory};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use self::redis::{RedisCache, RedisCacheConfig};
