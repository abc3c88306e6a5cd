//! Search command implementation

use clap::Args;
use tracing::info;

use crate::catalog::UnitStatus;
use crate::cli::SourceArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::output::{format_results, OutputFormat};
use crate::search::{Scope, UnitSearch, UnitSearchParams};

/// Arguments for the search command
#[derive(Args, Debug, Default)]
#[command(after_help = "EXAMPLES:
    leasehub search                               All units, default page size
    leasehub search \"garden\"                      Free-text match on title, id and location
    leasehub search --building crc-corporate-center --floor 5
    leasehub search --max-price 5000 --sort price-asc
    leasehub search --available --condition \"warm shell\"
    leasehub search -n 10 --offset 10 --json      Second page as JSON

SORT KEYS:
    price-asc, price-desc, size-asc, size-desc, floor-asc, floor-desc
    Units missing the sorted field are listed last.")]
pub struct SearchArgs {
    /// Free-text query (title, id, location, building name)
    pub query: Option<String>,

    /// Building id
    #[arg(short, long)]
    pub building: Option<String>,

    /// Floor number (0 = ground floor)
    #[arg(short, long, allow_hyphen_values = true)]
    pub floor: Option<String>,

    /// Minimum size in m2
    #[arg(long)]
    pub min_size: Option<String>,

    /// Maximum size in m2
    #[arg(long)]
    pub max_size: Option<String>,

    /// Maximum monthly price
    #[arg(long)]
    pub max_price: Option<String>,

    /// Unit status (available, coming soon, taken, unavailable)
    #[arg(long)]
    pub status: Option<String>,

    /// Unit condition (bare, warm shell, fitted)
    #[arg(long)]
    pub condition: Option<String>,

    /// Sort key
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Only units the source reports as available
    #[arg(short, long)]
    pub available: bool,

    /// Skip this many matches
    #[arg(long)]
    pub offset: Option<String>,

    /// Max results (default: search.default_limit from config)
    #[arg(short = 'n', long)]
    pub limit: Option<String>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl SearchArgs {
    /// Same parameter set the `/api/units` endpoint accepts
    fn to_params(&self) -> UnitSearchParams {
        UnitSearchParams {
            building: self.building.clone(),
            floor: self.floor.clone(),
            min_size: self.min_size.clone(),
            max_size: self.max_size.clone(),
            max_price: self.max_price.clone(),
            status: self.status.clone(),
            condition: self.condition.clone(),
            q: self.query.clone(),
            sort: self.sort.clone(),
            offset: self.offset.clone(),
            limit: self.limit.clone(),
        }
    }

    fn to_search(&self, config: &Config) -> Result<UnitSearch> {
        let search = self.to_params().into_search(config)?;
        Ok(if self.available {
            search.with_scope(Scope::Upstream(UnitStatus::Available))
        } else {
            search
        })
    }
}

/// Run the search command
pub async fn run(args: SearchArgs, mut config: Config) -> Result<()> {
    args.source.apply(&mut config);
    let search = args.to_search(&config)?;
    let source = args.source.open(&config)?;

    let units = source.list_units(search.scope.source_query().as_ref()).await?;
    let buildings = source.list_buildings().await?;
    info!(source = source.name(), units = units.len(), "Loaded catalog");

    let results = search.execute(&units, &buildings);
    print!(
        "{}",
        format_results(&results, OutputFormat::from_json_flag(args.json))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortKey;

    #[test]
    fn test_args_map_to_search() {
        let args = SearchArgs {
            building: Some("orchard-plaza".to_string()),
            floor: Some("-1".to_string()),
            sort: Some("price-desc".to_string()),
            limit: Some("5".to_string()),
            available: true,
            ..Default::default()
        };
        let search = args.to_search(&Config::default()).unwrap();
        assert_eq!(search.filter.building_id.as_deref(), Some("orchard-plaza"));
        assert_eq!(search.filter.floor, Some(-1));
        assert_eq!(search.filter.sort, Some(SortKey::PriceDesc));
        assert_eq!(search.limit, 5);
        assert_eq!(search.scope, Scope::Upstream(UnitStatus::Available));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let args = SearchArgs {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(args.to_search(&Config::default()).is_err());
    }
}
