//! Search request and result types

use serde::{Deserialize, Serialize};

use super::KnowledgeArticle;

/// Visibility scope of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Only published articles
    #[default]
    Public,
    /// Published and unpublished articles, for content administrators
    Admin,
}

/// A free-text search over the article corpus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query text
    pub text: String,
    /// Category filter, matched after normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Requested result count; missing or non-positive values fall back to the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub scope: SearchScope,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Resolves the requested limit against the configured bounds
    pub fn effective_limit(&self, default_limit: usize, max_limit: usize) -> usize {
        let max_limit = max_limit.max(1);

        match self.limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(max_limit).min(max_limit),
            _ => default_limit.clamp(1, max_limit),
        }
    }
}

/// Per-field overlap ratios behind a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMatches {
    pub title: f64,
    pub tags: f64,
    pub summary: f64,
    pub content: f64,
}

/// Relevance of one article for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub article_id: String,
    /// Weighted overlap, always within [0, 1]
    pub score: f64,
    pub matches: FieldMatches,
}

impl ScoredResult {
    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// A scored result together with the article it refers to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArticle {
    pub article: KnowledgeArticle,
    pub result: ScoredResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_defaults() {
        let query = SearchQuery::new("ferias");
        assert_eq!(query.effective_limit(10, 100), 10);
    }

    #[test]
    fn test_effective_limit_corrects_invalid_values() {
        assert_eq!(SearchQuery::new("x").with_limit(-5).effective_limit(10, 100), 10);
        assert_eq!(SearchQuery::new("x").with_limit(0).effective_limit(10, 100), 10);
        assert_eq!(SearchQuery::new("x").with_limit(500).effective_limit(10, 100), 100);
        assert_eq!(SearchQuery::new("x").with_limit(3).effective_limit(10, 100), 3);
    }

    #[test]
    fn test_default_scope_is_public() {
        assert_eq!(SearchQuery::new("x").scope, SearchScope::Public);
    }

    #[test]
    fn test_deserialize_query() {
        let query: SearchQuery =
            serde_json::from_str(r#"{"text": "holerite", "category": "payroll", "limit": 5}"#)
                .unwrap();
        assert_eq!(query.category.as_deref(), Some("payroll"));
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.scope, SearchScope::Public);
    }
}
