//! CLI command definitions and handlers

pub mod catalog;
pub mod nav;
pub mod search;
pub mod serve;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{CatalogSource, HttpCatalog, JsonStore, StaticCatalog};
use crate::core::config::Config;
use crate::core::error::Result;

const LONG_ABOUT: &str = r##"
Leasing catalog for commercial office buildings.

Serves a JSON API over buildings and units, runs the unit search pipeline
from the command line, and replays URL-hash navigation the way the
browser front end does.

QUICK START:
    1. leasehub seed              Write the demo catalog (one-time setup)
    2. leasehub serve --open      Start the API on localhost:3000
    3. leasehub search --floor 5  Search units from the terminal

DATA SOURCES:
    By default every command reads the catalog file in $LEASEHUB_HOME.
    --demo reads the built-in demo catalog, --remote URL talks to a
    running leasehub server.

EXAMPLES:
    leasehub search --building crc-corporate-center --sort price-asc
    leasehub search --available --condition fitted --json
    leasehub units CRC-501
    leasehub nav "#search-crc-corporate-center-5" back-unit --load
"##;

/// Leasing catalog server and search CLI
#[derive(Parser, Debug)]
#[command(name = "leasehub")]
#[command(author, version)]
#[command(about = "Leasing catalog server and search CLI")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the JSON API
    Serve(serve::ServeArgs),

    /// Filter, sort and page units
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Show one unit
    #[command(visible_alias = "u")]
    Units(catalog::UnitsArgs),

    /// List buildings, or the units of one building
    #[command(visible_alias = "b")]
    Buildings(catalog::BuildingsArgs),

    /// Replay navigation inputs and print each transition
    #[command(visible_alias = "n")]
    Nav(nav::NavArgs),

    /// Write the demo catalog to the catalog file
    Seed(catalog::SeedArgs),
}

/// Where catalog data is read from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Catalog file (default: $LEASEHUB_HOME/catalog.json)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Read the built-in demo catalog instead of the catalog file
    #[arg(long, conflicts_with = "remote")]
    pub demo: bool,

    /// Base URL of a running leasehub server
    #[arg(long)]
    pub remote: Option<String>,

    /// Admin token for a remote server (default: admin.token from config)
    #[arg(long, requires = "remote")]
    pub token: Option<String>,
}

impl SourceArgs {
    /// Apply `--catalog` on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.catalog {
            config.catalog.path = Some(path.clone());
        }
    }

    /// Open the selected catalog source
    pub fn open(&self, config: &Config) -> Result<Box<dyn CatalogSource>> {
        if self.demo {
            return Ok(Box::new(StaticCatalog));
        }
        if let Some(url) = &self.remote {
            let token = self.token.clone().or_else(|| config.admin.token.clone());
            return Ok(Box::new(HttpCatalog::new(url.as_str())?.with_token(token)));
        }
        let path = self.catalog.clone().map_or_else(|| config.catalog_path(), Ok)?;
        Ok(Box::new(JsonStore::open_or_seed(
            path,
            config.catalog.seed_on_empty,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_about_keeps_hash_examples() {
        let command = Cli::command();
        let about = command.get_long_about().map(|s| s.to_string()).unwrap_or_default();
        assert!(about.contains("\"#search-crc-corporate-center-5\" back-unit --load"));
    }

    #[test]
    fn test_demo_conflicts_with_remote() {
        let parsed = Cli::try_parse_from([
            "leasehub",
            "buildings",
            "--demo",
            "--remote",
            "http://localhost:3000",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_catalog_flag_overrides_config() {
        let args = SourceArgs {
            catalog: Some(PathBuf::from("/tmp/other.json")),
            ..Default::default()
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(
            config.catalog_path().unwrap(),
            PathBuf::from("/tmp/other.json")
        );
    }

    #[tokio::test]
    async fn test_demo_source() {
        let args = SourceArgs {
            demo: true,
            ..Default::default()
        };
        let source = args.open(&Config::default()).unwrap();
        assert!(!source.list_buildings().await.unwrap().is_empty());
    }
}
