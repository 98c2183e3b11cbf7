//! In-memory article repository for development, tests and the CLI

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::knowledge::{ArticleRepository, KnowledgeArticle};
use crate::domain::DomainError;

/// Article corpus held in process memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<Vec<KnowledgeArticle>>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<KnowledgeArticle>) -> Self {
        Self {
            articles: Arc::new(RwLock::new(articles)),
        }
    }

    /// Loads a JSON array of articles
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let data = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::storage(format!("Failed to read corpus '{}': {}", path.display(), e))
        })?;

        let articles: Vec<KnowledgeArticle> = serde_json::from_str(&data).map_err(|e| {
            DomainError::validation(format!("Invalid corpus '{}': {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), count = articles.len(), "Loaded article corpus");

        Ok(Self::with_articles(articles))
    }

    /// Inserts an article or replaces the one with the same id, keeping its position
    pub async fn upsert(&self, article: KnowledgeArticle) {
        let mut articles = self.articles.write().await;

        match articles.iter_mut().find(|existing| existing.id == article.id) {
            Some(existing) => *existing = article,
            None => articles.push(article),
        }
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|article| article.id != id);
        articles.len() != before
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list_articles(&self) -> Result<Vec<KnowledgeArticle>, DomainError> {
        Ok(self.articles.read().await.clone())
    }
}
