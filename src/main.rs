//! Leasehub CLI entry point

use anyhow::Context;
use clap::Parser;
use leasehub::cli::{self, Cli, Commands};
use leasehub::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("LEASEHUB_LOG"))
        .init();

    let parsed = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match parsed.command {
        Commands::Serve(args) => cli::serve::run(args, config)
            .await
            .context("Server failed"),
        Commands::Search(args) => cli::search::run(args, config)
            .await
            .context("Search failed"),
        Commands::Units(args) => {
            let id = args.id.clone();
            cli::catalog::run_units(args, config)
                .await
                .with_context(|| format!("Failed to show unit {}", id))
        }
        Commands::Buildings(args) => cli::catalog::run_buildings(args, config)
            .await
            .context("Failed to list buildings"),
        Commands::Nav(args) => cli::nav::run(args, config)
            .await
            .context("Navigation replay failed"),
        Commands::Seed(args) => cli::catalog::run_seed(args, config).context("Seeding failed"),
    }
}
