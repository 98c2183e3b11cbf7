//! Knowledge search over the article corpus
//!
//! Filters by visibility and category, scores with [`RelevanceScorer`], then ranks:
//! score, featured, view count, recency, corpus order. The corpus is read from the
//! repository on every call so results always reflect the latest edits.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::knowledge::{
    ArticleCategory, ArticleRepository, FieldWeights, KnowledgeArticle, RankedArticle, RelevanceScorer,
    ScoredResult, SearchQuery, SearchScope,
};
use crate::domain::text::{KeywordExtractor, DEFAULT_MIN_TOKEN_LEN};
use crate::domain::DomainError;

/// Search tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub weights: FieldWeights,
    pub min_token_len: usize,
    /// Added to the built-in Portuguese stopword list
    pub extra_stopwords: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            weights: FieldWeights::default(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Deterministic lexical search over knowledge articles
pub struct KnowledgeSearchService {
    repository: Arc<dyn ArticleRepository>,
    scorer: RelevanceScorer,
    config: SearchConfig,
}

impl fmt::Debug for KnowledgeSearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeSearchService")
            .field("scorer", &self.scorer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KnowledgeSearchService {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self::with_config(repository, SearchConfig::default())
    }

    pub fn with_config(repository: Arc<dyn ArticleRepository>, config: SearchConfig) -> Self {
        let extractor = KeywordExtractor::new()
            .with_stopwords(&config.extra_stopwords)
            .with_min_token_len(config.min_token_len);
        let scorer = RelevanceScorer::new(config.weights).with_extractor(extractor);

        Self {
            repository,
            scorer,
            config,
        }
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Ranked scores for `query`; empty when nothing matches or the corpus is unavailable
    pub async fn search(&self, query: &SearchQuery) -> Vec<ScoredResult> {
        self.search_articles(query)
            .await
            .into_iter()
            .map(|ranked| ranked.result)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps the matching articles alongside
    pub async fn search_articles(&self, query: &SearchQuery) -> Vec<RankedArticle> {
        let articles = match self.repository.list_articles().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "Article corpus unavailable, returning no results");
                return Vec::new();
            }
        };

        self.rank(&articles, query)
    }

    /// Filters, scores and orders an already loaded corpus
    pub fn rank(&self, articles: &[KnowledgeArticle], query: &SearchQuery) -> Vec<RankedArticle> {
        let tokens = self.scorer.query_tokens(&query.text);

        if tokens.is_empty() {
            debug!(query = %query.text, "Query has no significant terms");
            return Vec::new();
        }

        let category = match category_filter(query) {
            Ok(category) => category,
            Err(e) => {
                debug!(error = %e, "Unknown category filter, no article can match");
                return Vec::new();
            }
        };
        let limit = query.effective_limit(self.config.default_limit, self.config.max_limit);

        let mut candidates: Vec<(usize, &KnowledgeArticle, ScoredResult)> = articles
            .iter()
            .enumerate()
            .filter(|(_, article)| is_visible(article, query.scope))
            .filter(|(_, article)| category.is_none_or(|category| article.category == category))
            .map(|(position, article)| (position, article, self.scorer.score(&tokens, article)))
            .filter(|(_, _, result)| result.is_match())
            .collect();

        candidates.sort_by(|a, b| compare_ranked(a, b));

        debug!(
            query = %query.text,
            matched = candidates.len(),
            limit,
            "Knowledge search ranked"
        );

        candidates
            .into_iter()
            .take(limit)
            .map(|(_, article, result)| RankedArticle {
                article: article.clone(),
                result,
            })
            .collect()
    }
}

fn is_visible(article: &KnowledgeArticle, scope: SearchScope) -> bool {
    match scope {
        SearchScope::Public => article.published,
        SearchScope::Admin => true,
    }
}

/// Category requested by `query`: `Ok(None)` when absent or blank, `Err` when unknown
fn category_filter(query: &SearchQuery) -> Result<Option<ArticleCategory>, DomainError> {
    match query.category.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

fn compare_ranked(
    (a_pos, a, a_result): &(usize, &KnowledgeArticle, ScoredResult),
    (b_pos, b, b_result): &(usize, &KnowledgeArticle, ScoredResult),
) -> Ordering {
    b_result
        .score
        .total_cmp(&a_result.score)
        .then_with(|| b.featured.cmp(&a.featured))
        .then_with(|| b.view_count.cmp(&a.view_count))
        .then_with(|| b.recency().cmp(&a.recency()))
        .then_with(|| a_pos.cmp(b_pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::{ArticleCategory, MockArticleRepository};
    use crate::domain::DomainError;
    use crate::infrastructure::knowledge::InMemoryArticleRepository;
    use chrono::{TimeZone, Utc};

    fn date(month: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 1, 9, 0, 0).unwrap()
    }

    fn corpus() -> Vec<KnowledgeArticle> {
        vec![
            KnowledgeArticle::new("kb-vacation", "Política de Férias", ArticleCategory::Vacation)
                .with_summary("Regras para solicitar férias")
                .with_content("Cada colaborador tem direito a 30 dias de férias por ano.")
                .with_tags(["férias", "descanso"])
                .with_created_at(date(1))
                .published(),
            KnowledgeArticle::new(
                "kb-payslip",
                "Entendendo seu holerite e contracheque",
                ArticleCategory::Payroll,
            )
            .with_summary("Saiba ler cada linha do seu holerite")
            .with_content("O holerite mostra salário bruto, descontos e salário líquido.")
            .with_tags(["holerite", "salário"])
            .with_created_at(date(2))
            .published(),
            KnowledgeArticle::new("kb-draft", "Novo holerite digital", ArticleCategory::Payroll)
                .with_summary("Rascunho sobre o holerite digital")
                .with_created_at(date(3)),
            KnowledgeArticle::new("kb-benefits", "Vale refeição e benefícios", ArticleCategory::Benefits)
                .with_content("O salário não inclui o vale refeição.")
                .with_created_at(date(4))
                .published(),
        ]
    }

    fn service_with(articles: Vec<KnowledgeArticle>) -> KnowledgeSearchService {
        KnowledgeSearchService::new(Arc::new(InMemoryArticleRepository::with_articles(articles)))
    }

    fn ids(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.article_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_payslip_ranks_above_vacation() {
        let service = service_with(corpus());
        let results = service.search(&SearchQuery::new("holerite salário")).await;

        assert_eq!(results[0].article_id, "kb-payslip");
        assert!(results[0].score >= 0.2);
        assert!(!ids(&results).contains(&"kb-vacation"));
    }

    #[tokio::test]
    async fn test_unpublished_hidden_from_public_scope() {
        let service = service_with(corpus());

        let public = service.search(&SearchQuery::new("holerite digital")).await;
        assert!(!ids(&public).contains(&"kb-draft"));

        let admin = service
            .search(&SearchQuery::new("holerite digital").with_scope(SearchScope::Admin))
            .await;
        assert_eq!(admin[0].article_id, "kb-draft");
    }

    #[tokio::test]
    async fn test_category_filter() {
        let service = service_with(corpus());

        let results = service
            .search(&SearchQuery::new("salário").with_category("Benefits"))
            .await;
        assert_eq!(ids(&results), vec!["kb-benefits"]);

        let unknown = service
            .search(&SearchQuery::new("salário").with_category("travel"))
            .await;
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_category_filter_accepts_any_spelling() {
        let mut articles = corpus();
        articles.push(
            KnowledgeArticle::new("kb-course", "Curso de holerite online", ArticleCategory::ELearning)
                .with_created_at(date(5))
                .published(),
        );
        let service = service_with(articles);

        for spelling in ["elearning", "E-Learning", "e_learning", " e learning "] {
            let results = service
                .search(&SearchQuery::new("holerite").with_category(spelling))
                .await;
            assert_eq!(ids(&results), vec!["kb-course"], "category {:?}", spelling);
        }

        let blank = service
            .search(&SearchQuery::new("holerite").with_category("  "))
            .await;
        assert_eq!(blank.len(), 2);
    }

    #[tokio::test]
    async fn test_no_match_returns_empty_not_corpus() {
        let service = service_with(corpus());

        assert!(service.search(&SearchQuery::new("xyz123abc")).await.is_empty());
        assert!(service.search(&SearchQuery::new("")).await.is_empty());
        assert!(service.search(&SearchQuery::new("de um a")).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_corpus() {
        let service = service_with(Vec::new());
        assert!(service.search(&SearchQuery::new("férias")).await.is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_degrades_to_empty() {
        let mut repository = MockArticleRepository::new();
        repository
            .expect_list_articles()
            .times(1)
            .returning(|| Err(DomainError::storage("database unreachable")));

        let service = KnowledgeSearchService::new(Arc::new(repository));
        assert!(service.search(&SearchQuery::new("férias")).await.is_empty());
    }

    #[tokio::test]
    async fn test_tie_break_order() {
        let base = |id: &str| {
            KnowledgeArticle::new(id, "Guia de reembolso", ArticleCategory::Benefits)
                .with_created_at(date(1))
                .published()
        };

        let articles = vec![
            base("plain-old"),
            base("plain-recent").with_last_reviewed_at(date(6)),
            base("popular").with_view_count(50),
            base("featured").featured(),
            base("plain-old-2"),
        ];

        let service = service_with(articles);
        let results = service.search(&SearchQuery::new("reembolso")).await;

        assert_eq!(
            ids(&results),
            vec!["featured", "popular", "plain-recent", "plain-old", "plain-old-2"]
        );
    }

    #[tokio::test]
    async fn test_repeated_searches_are_identical() {
        let service = service_with(corpus());
        let query = SearchQuery::new("holerite salário férias");

        let first = service.search(&query).await;
        for _ in 0..5 {
            assert_eq!(service.search(&query).await, first);
        }
    }

    #[tokio::test]
    async fn test_limit_applied_and_corrected() {
        let articles: Vec<KnowledgeArticle> = (0..15)
            .map(|i| {
                KnowledgeArticle::new(format!("kb-{}", i), "Treinamento e-learning", ArticleCategory::ELearning)
                    .with_created_at(date(1))
                    .published()
            })
            .collect();
        let service = service_with(articles);

        let limited = service.search(&SearchQuery::new("treinamento").with_limit(3)).await;
        assert_eq!(ids(&limited), vec!["kb-0", "kb-1", "kb-2"]);

        let negative = service.search(&SearchQuery::new("treinamento").with_limit(-1)).await;
        assert_eq!(negative.len(), 10);
    }

    #[tokio::test]
    async fn test_scores_within_bounds() {
        let service = service_with(corpus());
        let results = service
            .search(&SearchQuery::new("holerite salário férias benefícios").with_scope(SearchScope::Admin))
            .await;

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_is_pure() {
        let service = service_with(Vec::new());
        let articles = corpus();

        let ranked = service.rank(&articles, &SearchQuery::new("férias"));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].article.id, "kb-vacation");
        assert_eq!(ranked[0].result.article_id, "kb-vacation");
    }

    #[test]
    fn test_custom_stopwords_from_config() {
        let config = SearchConfig {
            extra_stopwords: vec!["política".to_string()],
            ..SearchConfig::default()
        };
        let service = KnowledgeSearchService::with_config(
            Arc::new(InMemoryArticleRepository::new()),
            config,
        );

        assert!(service.rank(&corpus(), &SearchQuery::new("política")).is_empty());
    }
}
