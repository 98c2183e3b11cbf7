//! Portal Knowledge
//!
//! Knowledge-base search and chat response caching for the employee portal:
//! - Deterministic lexical search over knowledge articles (Portuguese-aware normalization)
//! - Fingerprint-keyed response cache over Redis or an in-process store
//! - Graceful degradation: backend failures become empty results or cache misses

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::knowledge::ArticleRepository;
use infrastructure::knowledge::KnowledgeSearchService;
use infrastructure::services::{CacheGovernor, ResponseCache};

/// Service context built once at startup and shared by request handlers
#[derive(Debug, Clone)]
pub struct KnowledgeCore {
    pub search: Arc<KnowledgeSearchService>,
    pub cache: Arc<CacheGovernor>,
}

impl KnowledgeCore {
    pub fn new(search: KnowledgeSearchService, cache: CacheGovernor) -> Self {
        Self {
            search: Arc::new(search),
            cache: Arc::new(cache),
        }
    }

    /// Wires search over `repository` and probes the configured cache backend.
    ///
    /// An unreachable cache leaves caching disabled for the life of the process.
    pub async fn bootstrap(config: &AppConfig, repository: Arc<dyn ArticleRepository>) -> Self {
        let search = KnowledgeSearchService::with_config(repository, config.search.clone());
        let cache = CacheGovernor::new(ResponseCache::connect(&config.cache).await);

        tracing::info!(
            cache_enabled = cache.is_enabled(),
            backend = %config.cache.backend,
            "Knowledge core ready"
        );

        Self::new(search, cache)
    }
}
