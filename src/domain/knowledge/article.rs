//! Knowledge article snapshot

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::text::normalize;
use crate::domain::DomainError;

/// Help-center category an article belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleCategory {
    Vacation,
    Payroll,
    Benefits,
    ELearning,
    Policies,
    Onboarding,
    General,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 7] = [
        Self::Vacation,
        Self::Payroll,
        Self::Benefits,
        Self::ELearning,
        Self::Policies,
        Self::Onboarding,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Payroll => "payroll",
            Self::Benefits => "benefits",
            Self::ELearning => "e_learning",
            Self::Policies => "policies",
            Self::Onboarding => "onboarding",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArticleCategory {
    type Err = DomainError;

    /// Case, accent and separator insensitive: `e_learning`, `E-Learning` and `elearning` agree
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = compact(&normalize(s));

        Self::ALL
            .into_iter()
            .find(|category| compact(category.as_str()) == wanted)
            .ok_or_else(|| DomainError::validation(format!("Unknown article category: {}", s)))
    }
}

fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .collect()
}

/// Read-only article snapshot handed over by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub category: ArticleCategory,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub helpful_count: u64,
    #[serde(default = "default_version")]
    pub version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    1
}

impl KnowledgeArticle {
    /// Creates an unpublished draft stamped with the current time
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: ArticleCategory) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            content: String::new(),
            category,
            tags: BTreeSet::new(),
            keywords: BTreeSet::new(),
            published: false,
            featured: false,
            view_count: 0,
            helpful_count: 0,
            version: default_version(),
            created_at: Utc::now(),
            updated_at: None,
            last_reviewed_at: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn with_view_count(mut self, views: u64) -> Self {
        self.view_count = views;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_last_reviewed_at(mut self, reviewed_at: DateTime<Utc>) -> Self {
        self.last_reviewed_at = Some(reviewed_at);
        self
    }

    /// Most recent review, or creation time when never reviewed
    pub fn recency(&self) -> DateTime<Utc> {
        self.last_reviewed_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_from_str() {
        assert_eq!("payroll".parse::<ArticleCategory>().unwrap(), ArticleCategory::Payroll);
        assert_eq!("PAYROLL".parse::<ArticleCategory>().unwrap(), ArticleCategory::Payroll);
        assert_eq!(
            "e-learning".parse::<ArticleCategory>().unwrap(),
            ArticleCategory::ELearning
        );
        assert_eq!(
            "E Learning".parse::<ArticleCategory>().unwrap(),
            ArticleCategory::ELearning
        );
    }

    #[test]
    fn test_category_from_str_ignores_separators() {
        for raw in ["elearning", "E-Learning", "e learning", "E_LEARNING"] {
            assert_eq!(raw.parse::<ArticleCategory>().unwrap(), ArticleCategory::ELearning);
        }
    }

    #[test]
    fn test_category_from_str_unknown() {
        assert!("travel".parse::<ArticleCategory>().is_err());
        assert!("".parse::<ArticleCategory>().is_err());
    }

    #[test]
    fn test_category_serde_matches_as_str() {
        for category in ArticleCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_recency_prefers_review_date() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let reviewed = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let article = KnowledgeArticle::new("kb-1", "Férias", ArticleCategory::Vacation)
            .with_created_at(created);
        assert_eq!(article.recency(), created);

        let article = article.with_last_reviewed_at(reviewed);
        assert_eq!(article.recency(), reviewed);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "id": "kb-7",
            "title": "Entendendo seu holerite",
            "category": "payroll",
            "created_at": "2024-03-01T12:00:00Z"
        }"#;

        let article: KnowledgeArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.category, ArticleCategory::Payroll);
        assert!(!article.published);
        assert_eq!(article.version, 1);
        assert!(article.tags.is_empty());
    }
}
