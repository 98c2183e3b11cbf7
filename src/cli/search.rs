//! Search command - ranks a JSON corpus and prints the results

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::domain::knowledge::{SearchQuery, SearchScope};
use crate::infrastructure::knowledge::{InMemoryArticleRepository, KnowledgeSearchService};

/// Arguments for the search command
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// JSON file holding an array of articles
    #[arg(long)]
    pub corpus: PathBuf,

    /// Free-text query
    #[arg(long, short)]
    pub query: String,

    /// Restrict results to one category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Maximum results; zero or negative uses the configured default
    #[arg(long, short, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Include unpublished articles
    #[arg(long)]
    pub admin: bool,
}

impl SearchArgs {
    fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(self.query.clone());

        if let Some(category) = &self.category {
            query = query.with_category(category.clone());
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        if self.admin {
            query = query.with_scope(SearchScope::Admin);
        }
        query
    }
}

/// Run the search command
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::init()?;

    let repository = InMemoryArticleRepository::from_json_file(&args.corpus).await?;
    let service = KnowledgeSearchService::with_config(Arc::new(repository), config.search);

    let results = service.search_articles(&args.to_query()).await;
    info!(query = %args.query, results = results.len(), "Search complete");

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
