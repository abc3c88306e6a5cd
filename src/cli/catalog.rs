//! Catalog commands: `units`, `buildings` and `seed`

use clap::Args;

use crate::catalog::{seed, JsonStore, UnitQuery};
use crate::cli::SourceArgs;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::output::{format_buildings, format_results, format_unit, OutputFormat};
use crate::search::{FilterSpec, UnitSearch};

/// Arguments for the units command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    leasehub units CRC-501            Detail card for one unit
    leasehub units CRC-501 --json     Full record as JSON
    leasehub units OPL-12 --demo      Read from the demo catalog")]
pub struct UnitsArgs {
    /// Unit id
    pub id: String,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the buildings command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    leasehub buildings                         List every building
    leasehub buildings crc-corporate-center    Units in one building
    leasehub buildings --remote http://host:3000 --json")]
pub struct BuildingsArgs {
    /// Building id; lists that building's units
    pub id: Option<String>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    leasehub seed                     Write the demo catalog if the file is empty
    leasehub seed --force             Replace existing buildings and units
    leasehub seed --catalog ./c.json  Seed a specific file

Appointments already in the file are kept.")]
pub struct SeedArgs {
    /// Catalog file (default: $LEASEHUB_HOME/catalog.json)
    #[arg(long)]
    pub catalog: Option<std::path::PathBuf>,

    /// Replace a catalog that already has data
    #[arg(short, long)]
    pub force: bool,
}

/// Run the units command
pub async fn run_units(args: UnitsArgs, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    let source = args.source.open(&config)?;
    let unit = source.get_unit(&args.id).await?;
    print!(
        "{}",
        format_unit(&unit, OutputFormat::from_json_flag(args.json))
    );
    Ok(())
}

/// Run the buildings command
pub async fn run_buildings(args: BuildingsArgs, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    let source = args.source.open(&config)?;
    let format = OutputFormat::from_json_flag(args.json);

    match &args.id {
        None => {
            let buildings = source.list_buildings().await?;
            print!("{}", format_buildings(&buildings, format));
        }
        Some(id) => {
            let building = source.get_building(id).await?;
            let units = source
                .list_units(Some(&UnitQuery::in_building(id.as_str())))
                .await?;
            let results = UnitSearch::new(FilterSpec::default())
                .execute(&units, std::slice::from_ref(&building));
            if format == OutputFormat::Human {
                println!("{} ({})", building.name, building.id);
            }
            print!("{}", format_results(&results, format));
        }
    }
    Ok(())
}

/// Write the demo catalog. Returns the number of units written.
pub fn seed_catalog(store: &JsonStore, force: bool) -> Result<usize> {
    if !store.is_empty() && !force {
        return Err(Error::validation(format!(
            "catalog {} already has data (use --force to replace it)",
            store.path().display()
        )));
    }
    store.replace_all(seed::buildings(), seed::units())?;
    Ok(seed::units().len())
}

/// Run the seed command
pub fn run_seed(args: SeedArgs, config: Config) -> Result<()> {
    let path = match args.catalog {
        Some(path) => path,
        None => {
            Config::ensure_home()?;
            config.catalog_path()?
        }
    };
    let store = JsonStore::open(&path)?;
    let units = seed_catalog(&store, args.force)?;
    println!(
        "Seeded {} buildings and {} units into {}",
        seed::buildings().len(),
        units,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_writes_demo_catalog() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::open(temp.path().join("catalog.json")).unwrap();

        let written = seed_catalog(&store, false).unwrap();
        assert_eq!(written, seed::units().len());
        assert_eq!(
            store.list_buildings().await.unwrap().len(),
            seed::buildings().len()
        );
    }

    #[test]
    fn test_seed_refuses_non_empty_without_force() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::open(temp.path().join("catalog.json")).unwrap();
        seed_catalog(&store, false).unwrap();

        assert!(matches!(
            seed_catalog(&store, false),
            Err(Error::Validation { .. })
        ));
        assert!(seed_catalog(&store, true).is_ok());
    }
}
