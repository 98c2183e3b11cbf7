use clap::Parser;
use portal_knowledge::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Search(args) => cli::search::run(args).await,
        Command::Cache { action } => cli::cache::run(action).await,
    }
}
