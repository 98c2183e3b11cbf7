//! Weighted lexical-overlap scoring

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FieldMatches, KnowledgeArticle, ScoredResult};
use crate::domain::text::{extract_keywords, KeywordExtractor};
use crate::domain::DomainError;

/// Relative weight of each article field in the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    /// Tags and keywords share one field
    pub tags: f64,
    pub summary: f64,
    pub content: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.4,
            tags: 0.3,
            summary: 0.2,
            content: 0.1,
        }
    }
}

impl FieldWeights {
    pub fn new(title: f64, tags: f64, summary: f64, content: f64) -> Self {
        Self {
            title,
            tags,
            summary,
            content,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [self.title, self.tags, self.summary, self.content]
    }

    /// Checks weights are finite, non-negative, not all zero and ordered
    /// title >= tags >= summary >= content
    pub fn validate(&self) -> Result<(), DomainError> {
        let weights = self.as_array();

        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(DomainError::validation(
                "Field weights must be finite and non-negative",
            ));
        }

        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(DomainError::validation(
                "At least one field weight must be positive",
            ));
        }

        if !weights.windows(2).all(|pair| pair[0] >= pair[1]) {
            return Err(DomainError::validation(
                "Field weights must be ordered title >= tags >= summary >= content",
            ));
        }

        Ok(())
    }

    /// Rescales the weights so they sum to one
    pub fn normalized(&self) -> Self {
        let total: f64 = self.as_array().iter().sum();

        if total <= 0.0 || !total.is_finite() {
            return Self::default();
        }

        Self {
            title: self.title / total,
            tags: self.tags / total,
            summary: self.summary / total,
            content: self.content / total,
        }
    }
}

/// Fraction of distinct query terms present in `field`
fn overlap_ratio(query_terms: &HashSet<&str>, field: &HashSet<String>) -> f64 {
    if query_terms.is_empty() || field.is_empty() {
        return 0.0;
    }

    let matched = query_terms
        .iter()
        .filter(|term| field.contains(**term))
        .count();

    matched as f64 / query_terms.len() as f64
}

/// Overlap score between two free texts, in [0, 1].
///
/// Uses the default extractor and treats `candidate` as a single field.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let query_tokens = extract_keywords(query);
    let query_terms: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let field: HashSet<String> = extract_keywords(candidate).into_iter().collect();

    overlap_ratio(&query_terms, &field).clamp(0.0, 1.0)
}

/// Scores articles against query keywords using per-field weights
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: FieldWeights,
    extractor: KeywordExtractor,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(FieldWeights::default())
    }
}

impl RelevanceScorer {
    /// Creates a scorer; weights are normalized, invalid ones replaced by defaults
    pub fn new(weights: FieldWeights) -> Self {
        let weights = match weights.validate() {
            Ok(()) => weights.normalized(),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid field weights, using defaults");
                FieldWeights::default().normalized()
            }
        };

        Self {
            weights,
            extractor: KeywordExtractor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Extracts query keywords with this scorer's extractor
    pub fn query_tokens(&self, text: &str) -> Vec<String> {
        self.extractor.extract(text)
    }

    fn field_terms(&self, text: &str) -> HashSet<String> {
        self.extractor.extract(text).into_iter().collect()
    }

    fn tag_terms(&self, article: &KnowledgeArticle) -> HashSet<String> {
        article
            .tags
            .iter()
            .chain(article.keywords.iter())
            .flat_map(|tag| self.extractor.extract(tag))
            .collect()
    }

    /// Scores one article for already-extracted query tokens
    pub fn score(&self, query_tokens: &[String], article: &KnowledgeArticle) -> ScoredResult {
        let query_terms: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();

        if query_terms.is_empty() {
            return ScoredResult {
                article_id: article.id.clone(),
                score: 0.0,
                matches: FieldMatches::default(),
            };
        }

        let matches = FieldMatches {
            title: overlap_ratio(&query_terms, &self.field_terms(&article.title)),
            tags: overlap_ratio(&query_terms, &self.tag_terms(article)),
            summary: overlap_ratio(&query_terms, &self.field_terms(&article.summary)),
            content: overlap_ratio(&query_terms, &self.field_terms(&article.content)),
        };

        let score = self.weights.title * matches.title
            + self.weights.tags * matches.tags
            + self.weights.summary * matches.summary
            + self.weights.content * matches.content;

        ScoredResult {
            article_id: article.id.clone(),
            score: score.clamp(0.0, 1.0),
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::ArticleCategory;

    fn payslip_article() -> KnowledgeArticle {
        KnowledgeArticle::new(
            "kb-payslip",
            "Entendendo seu holerite e contracheque",
            ArticleCategory::Payroll,
        )
        .with_summary("Saiba ler cada linha do seu holerite")
        .with_content("O holerite mostra salário bruto, descontos e salário líquido.")
        .with_tags(["holerite", "salário"])
        .published()
    }

    fn vacation_article() -> KnowledgeArticle {
        KnowledgeArticle::new("kb-vacation", "Política de Férias", ArticleCategory::Vacation)
            .with_summary("Regras para solicitar férias")
            .with_content("Cada colaborador tem direito a 30 dias de férias por ano.")
            .with_tags(["férias", "descanso"])
            .published()
    }

    #[test]
    fn test_similarity_examples() {
        assert!(similarity("férias", "Como solicitar férias na empresa") >= 0.3);
        assert_eq!(similarity("xyz123abc", "Política de férias da empresa"), 0.0);
    }

    #[test]
    fn test_similarity_empty_inputs() {
        assert_eq!(similarity("férias", ""), 0.0);
        assert_eq!(similarity("", "Política de férias"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("de um a", "de um a"), 0.0);
    }

    #[test]
    fn test_similarity_bounded() {
        let cases = [
            ("férias férias férias", "férias"),
            ("holerite salário", "holerite"),
            ("ação", "AÇÃO ação acao"),
            ("日本語 テキスト", "日本語"),
        ];

        for (query, candidate) in cases {
            let score = similarity(query, candidate);
            assert!((0.0..=1.0).contains(&score), "{} for {:?}", score, (query, candidate));
        }
    }

    #[test]
    fn test_similarity_counts_distinct_terms() {
        // Repeating a matched term must not outweigh an unmatched one
        assert_eq!(similarity("holerite holerite salario", "holerite"), 0.5);
    }

    #[test]
    fn test_weights_default_valid() {
        assert!(FieldWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_validation() {
        assert!(FieldWeights::new(0.1, 0.2, 0.3, 0.4).validate().is_err());
        assert!(FieldWeights::new(-1.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(FieldWeights::new(0.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(FieldWeights::new(f64::NAN, 0.1, 0.1, 0.1).validate().is_err());
        assert!(FieldWeights::new(1.0, 1.0, 0.5, 0.0).validate().is_ok());
    }

    #[test]
    fn test_weights_normalized_sum_to_one() {
        let weights = FieldWeights::new(4.0, 3.0, 2.0, 1.0).normalized();
        let total = weights.title + weights.tags + weights.summary + weights.content;
        assert!((total - 1.0).abs() < 1e-9);
        assert!((weights.title - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_fall_back_to_defaults() {
        let scorer = RelevanceScorer::new(FieldWeights::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(*scorer.weights(), FieldWeights::default().normalized());
    }

    #[test]
    fn test_score_payslip_scenario() {
        let scorer = RelevanceScorer::default();
        let tokens = scorer.query_tokens("holerite salário");

        let payslip = scorer.score(&tokens, &payslip_article());
        let vacation = scorer.score(&tokens, &vacation_article());

        assert!(payslip.score >= 0.2, "payslip score {}", payslip.score);
        assert!(payslip.score > vacation.score);
        assert_eq!(vacation.score, 0.0);
        assert_eq!(payslip.matches.title, 0.5);
        assert_eq!(payslip.matches.tags, 1.0);
    }

    #[test]
    fn test_score_empty_query() {
        let scorer = RelevanceScorer::default();
        let result = scorer.score(&[], &payslip_article());

        assert_eq!(result.score, 0.0);
        assert_eq!(result.matches, FieldMatches::default());
        assert!(!result.is_match());
    }

    #[test]
    fn test_score_empty_fields() {
        let scorer = RelevanceScorer::default();
        let article = KnowledgeArticle::new("kb-empty", "", ArticleCategory::General);
        let tokens = scorer.query_tokens("holerite");

        assert_eq!(scorer.score(&tokens, &article).score, 0.0);
    }

    #[test]
    fn test_title_outweighs_content() {
        let scorer = RelevanceScorer::default();
        let tokens = scorer.query_tokens("reembolso");

        let in_title = KnowledgeArticle::new("a", "Reembolso de despesas", ArticleCategory::Benefits);
        let in_content = KnowledgeArticle::new("b", "Despesas", ArticleCategory::Benefits)
            .with_content("Pedidos de reembolso seguem o fluxo padrão");

        assert!(scorer.score(&tokens, &in_title).score > scorer.score(&tokens, &in_content).score);
    }

    #[test]
    fn test_keywords_count_as_tags() {
        let scorer = RelevanceScorer::default();
        let tokens = scorer.query_tokens("contracheque");
        let article = KnowledgeArticle::new("kb-1", "Pagamentos", ArticleCategory::Payroll)
            .with_keywords(["Contracheque mensal"]);

        let result = scorer.score(&tokens, &article);
        assert_eq!(result.matches.tags, 1.0);
        assert!(result.score > 0.0);
    }
}
