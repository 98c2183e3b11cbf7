//! Article source trait

use async_trait::async_trait;

use super::KnowledgeArticle;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read access to the article corpus owned by the persistence layer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Returns a snapshot of every article, published or not
    async fn list_articles(&self) -> Result<Vec<KnowledgeArticle>, DomainError>;
}
