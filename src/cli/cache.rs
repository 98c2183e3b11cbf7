//! Cache command - operational access to the response cache

use clap::Subcommand;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::cache::CacheStats;
use crate::infrastructure::services::{CacheGovernor, ResponseCache};

#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommand {
    /// Check whether the configured backend is reachable
    Probe,

    /// Print backend state and the number of stored responses.
    ///
    /// Hit and miss counters live in the serving process, so they are not reported here.
    Stats,

    /// Remove every cached response
    Clear,

    /// Remove every cached response of one scope
    Invalidate {
        #[arg(long)]
        scope: String,
    },
}

/// Run a cache command
pub async fn run(command: CacheCommand) -> anyhow::Result<()> {
    let config = super::init()?;
    let cache = ResponseCache::connect(&config.cache).await;

    match command {
        CacheCommand::Probe => {
            let reachable = cache.ping().await;
            let report = json!({
                "backend": config.cache.backend.to_string(),
                "enabled": cache.is_enabled(),
                "reachable": reachable,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);

            if !reachable {
                anyhow::bail!("Cache backend '{}' is not reachable", config.cache.backend);
            }
        }
        CacheCommand::Stats => {
            let stats = CacheGovernor::new(cache).stats().await;
            let report = stats_report(&config.cache.namespace, &stats);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CacheCommand::Clear => {
            let removed = CacheGovernor::new(cache).clear_all().await;
            info!(removed, "Response cache cleared");
            println!("{}", json!({ "removed": removed }));
        }
        CacheCommand::Invalidate { scope } => {
            let removed = CacheGovernor::new(cache).invalidate_scope(&scope).await;
            info!(scope = %scope, removed, "Response cache scope invalidated");
            println!("{}", json!({ "scope": scope, "removed": removed }));
        }
    }

    Ok(())
}

/// Fields of `stats` that are meaningful outside the serving process
fn stats_report(namespace: &str, stats: &CacheStats) -> Value {
    json!({
        "namespace": namespace,
        "enabled": stats.enabled,
        "entries": stats.entries,
    })
}
