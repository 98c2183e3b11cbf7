//! Knowledge domain - Articles, search queries and relevance scoring

mod article;
mod query;
mod repository;
mod scorer;

pub use article::{ArticleCategory, KnowledgeArticle};
pub use query::{FieldMatches, RankedArticle, ScoredResult, SearchQuery, SearchScope};
pub use repository::ArticleRepository;
pub use scorer::{similarity, FieldWeights, RelevanceScorer};

#[cfg(test)]
pub use repository::MockArticleRepository;
