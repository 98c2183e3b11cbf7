//! CLI module for Portal Knowledge
//!
//! Operational subcommands:
//! - `search`: run a knowledge search against a JSON corpus
//! - `cache`: probe, inspect and invalidate the response cache

pub mod cache;
pub mod search;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Portal Knowledge - knowledge search and response cache operations
#[derive(Parser)]
#[command(name = "portal-knowledge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search a knowledge article corpus
    Search(search::SearchArgs),

    /// Response cache operations
    Cache {
        #[command(subcommand)]
        action: cache::CacheCommand,
    },
}

/// Loads `.env` and configuration, then installs logging
fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
