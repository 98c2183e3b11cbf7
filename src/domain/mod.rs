//! Domain layer - Core search and caching logic

pub mod cache;
pub mod error;
pub mod knowledge;
pub mod text;

pub use cache::{
    Cache, CacheEntry, CacheExt, CacheStats, CachedResponse, ConversationInputs, Fingerprint,
    FingerprintGenerator,
};
pub use error::DomainError;
pub use knowledge::{
    similarity, ArticleCategory, ArticleRepository, FieldMatches, FieldWeights,
    KnowledgeArticle, RankedArticle, RelevanceScorer, ScoredResult, SearchQuery, SearchScope,
};
pub use text::{extract_keywords, normalize, KeywordExtractor};
