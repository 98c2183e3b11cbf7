//! Cache backend selection and startup probing

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendType {
    /// External Redis service
    #[default]
    Redis,
    /// Process-local moka cache
    InMemory,
    /// No caching; every lookup misses
    Disabled,
}

impl std::fmt::Display for CacheBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendType::Redis => write!(f, "redis"),
            CacheBackendType::InMemory => write!(f, "in_memory"),
            CacheBackendType::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for CacheBackendType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheBackendType::Redis),
            "in_memory" | "inmemory" | "memory" => Ok(CacheBackendType::InMemory),
            "disabled" | "none" | "off" => Ok(CacheBackendType::Disabled),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: redis, in_memory, disabled",
                s
            ))),
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendType,
    /// Redis URL (required for the Redis backend)
    pub redis_url: Option<String>,
    /// Backend-level key prefix, applied beneath the namespace
    pub key_prefix: Option<String>,
    /// Namespace every response key lives under
    pub namespace: String,
    pub default_ttl_secs: u64,
    /// Bound for every individual backend call
    pub operation_timeout_ms: u64,
    /// Entry cap for the in-memory backend
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendType::default(),
            redis_url: Some("redis://127.0.0.1:6379".to_string()),
            key_prefix: None,
            namespace: "chat:responses".to_string(),
            default_ttl_secs: 3600,
            operation_timeout_ms: 1500,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: CacheBackendType::InMemory,
            ..Default::default()
        }
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: CacheBackendType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: CacheBackendType::Disabled,
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Per-call timeout; never zero
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms.max(1))
    }

    /// Rejects key parts that Redis `MATCH` and the in-memory glob would read differently.
    ///
    /// Both are literal segments of every pattern, so they must be free of glob syntax.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.namespace.trim().is_empty() {
            return Err(DomainError::configuration("Cache namespace must not be empty"));
        }

        check_literal("namespace", &self.namespace)?;

        if let Some(prefix) = &self.key_prefix {
            check_literal("key_prefix", prefix)?;
        }

        Ok(())
    }
}

const GLOB_METACHARACTERS: [char; 5] = ['*', '?', '[', ']', '\\'];

fn check_literal(field: &str, value: &str) -> Result<(), DomainError> {
    match value.chars().find(|c| GLOB_METACHARACTERS.contains(c)) {
        Some(c) => Err(DomainError::configuration(format!(
            "Cache {} '{}' contains glob character '{}'",
            field, value, c
        ))),
        None => Ok(()),
    }
}

/// Builds cache backends from configuration
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the configured backend, `None` when caching is disabled
    pub async fn create(&self, config: &CacheConfig) -> Result<Option<Arc<dyn Cache>>, DomainError> {
        config.validate()?;

        match config.backend {
            CacheBackendType::Disabled => Ok(None),
            CacheBackendType::InMemory => {
                let in_memory_config =
                    InMemoryCacheConfig::default().with_max_capacity(config.max_capacity);

                Ok(Some(Arc::new(InMemoryCache::with_config(in_memory_config))))
            }
            CacheBackendType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache backend")
                })?;

                let mut redis_config =
                    RedisCacheConfig::new(url).with_connection_timeout(config.operation_timeout());

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let cache = RedisCache::new(redis_config).await?;
                Ok(Some(Arc::new(cache)))
            }
        }
    }

    /// Creates the backend and probes it once.
    ///
    /// Any failure (bad config, unreachable service, slow ping) yields `None`, which
    /// callers treat as "cache disabled for the lifetime of the process".
    pub async fn connect(&self, config: &CacheConfig) -> Option<Arc<dyn Cache>> {
        let backend = match self.create(config).await {
            Ok(Some(backend)) => backend,
            Ok(None) => {
                info!("Response cache disabled by configuration");
                return None;
            }
            Err(e) => {
                warn!(backend = %config.backend, error = %e, "Response cache unavailable, continuing without it");
                return None;
            }
        };

        match tokio::time::timeout(config.operation_timeout(), backend.ping()).await {
            Ok(Ok(())) => {
                info!(backend = backend.backend_name(), "Response cache enabled");
                Some(backend)
            }
            Ok(Err(e)) => {
                warn!(backend = backend.backend_name(), error = %e, "Response cache probe failed, continuing without it");
                None
            }
            Err(_) => {
                warn!(
                    backend = backend.backend_name(),
                    timeout_ms = config.operation_timeout_ms,
                    "Response cache probe timed out, continuing without it"
                );
                None
            }
        }
    }
}
