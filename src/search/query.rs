//! Query parsing and execution

use crate::catalog::model::{Building, Unit, UnitQuery, UnitStatus};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::search::filter::{BuildingNames, FilterSpec};
use crate::search::results::SearchResponse;
use crate::search::sort::sort_units;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

/// Where status scoping happens for a view.
///
/// `Upstream` views ask the data source for pre-scoped units and never
/// re-filter on status themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Unscoped,
    Upstream(UnitStatus),
}

impl Scope {
    /// Query to hand the data source, if any
    pub fn source_query(self) -> Option<UnitQuery> {
        match self {
            Scope::Unscoped => None,
            Scope::Upstream(status) => Some(UnitQuery {
                building_id: None,
                status: Some(status),
            }),
        }
    }

    pub fn label(self) -> String {
        match self {
            Scope::Unscoped => "all".to_string(),
            Scope::Upstream(status) => status.as_str().to_lowercase(),
        }
    }
}

/// Filter then sort. Input order is preserved among equal sort keys and
/// when no sort is requested.
pub fn filter_units(units: &[Unit], buildings: &[Building], spec: &FilterSpec) -> Vec<Unit> {
    let names = BuildingNames::new(buildings);
    let mut matched: Vec<Unit> = units
        .iter()
        .filter(|unit| spec.matches(unit, &names))
        .cloned()
        .collect();

    if let Some(key) = spec.sort {
        sort_units(&mut matched, key);
    }

    matched
}

/// A filtered, sorted and paged unit search
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSearch {
    pub filter: FilterSpec,
    pub scope: Scope,
    pub offset: usize,
    pub limit: usize,
}

impl UnitSearch {
    pub fn new(filter: FilterSpec) -> Self {
        Self {
            filter,
            scope: Scope::Unscoped,
            offset: 0,
            limit: usize::MAX,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Key for the result cache. Two searches with the same key always
    /// produce the same page from the same catalog.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.scope.label(),
            self.filter.to_query_string(),
            self.offset,
            self.limit
        )
    }

    /// Run against units already scoped by `self.scope`
    pub fn execute(&self, units: &[Unit], buildings: &[Building]) -> SearchResponse {
        let start = Instant::now();

        let matched = filter_units(units, buildings, &self.filter);
        let total = matched.len();
        let page: Vec<Unit> = matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();

        let elapsed = start.elapsed();
        debug!(
            query = %self.filter.to_query_string(),
            scope = %self.scope.label(),
            scanned = units.len(),
            total,
            returned = page.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Unit search completed"
        );

        SearchResponse {
            units: page,
            total,
            offset: self.offset,
            limit: self.limit,
            query: self.filter.to_query_string(),
            scope: self.scope.label(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Raw query-string parameters of `GET /api/units`.
///
/// Everything arrives as text so blank values (`?floor=`) read as absent
/// and malformed ones become validation errors with a useful message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UnitSearchParams {
    pub building: Option<String>,
    pub floor: Option<String>,
    pub min_size: Option<String>,
    pub max_size: Option<String>,
    pub max_price: Option<String>,
    pub status: Option<String>,
    pub condition: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

fn parse_field<T>(name: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::validation(format!("invalid {} '{}'", name, raw))),
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<f64>> {
    let bound: Option<f64> = parse_field(name, value)?;
    match bound {
        Some(v) if !v.is_finite() => Err(Error::validation(format!(
            "{} must be a finite number",
            name
        ))),
        other => Ok(other),
    }
}

impl UnitSearchParams {
    pub fn to_filter(&self) -> Result<FilterSpec> {
        Ok(FilterSpec {
            building_id: self.building.clone(),
            floor: parse_field("floor", self.floor.as_deref())?,
            min_size: parse_bound("min_size", self.min_size.as_deref())?,
            max_size: parse_bound("max_size", self.max_size.as_deref())?,
            max_price: parse_bound("max_price", self.max_price.as_deref())?,
            status: non_blank(&self.status).map(str::parse).transpose()?,
            condition: non_blank(&self.condition).map(str::parse).transpose()?,
            search_text: self.q.clone(),
            sort: non_blank(&self.sort).map(str::parse).transpose()?,
        }
        .normalized())
    }

    /// Build a paged search, clamping the page size to the configured bounds
    pub fn into_search(self, config: &Config) -> Result<UnitSearch> {
        let filter = self.to_filter()?;
        let offset: Option<usize> = parse_field("offset", self.offset.as_deref())?;
        let limit: Option<usize> = parse_field("limit", self.limit.as_deref())?;

        Ok(UnitSearch::new(filter)
            .with_offset(offset.unwrap_or(0))
            .with_limit(config.page_limit(limit)))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::UnitCondition;
    use crate::search::sort::SortKey;

    fn unit(id: &str, price: f64, size: f64) -> Unit {
        Unit {
            price: Some(price),
            size: Some(size),
            ..Unit::new(id, id, UnitStatus::Available)
        }
    }

    fn sample() -> Vec<Unit> {
        vec![
            unit("A", 1000.0, 50.0),
            unit("B", 2000.0, 80.0),
            unit("C", 3000.0, 120.0),
        ]
    }

    fn ids(units: &[Unit]) -> Vec<&str> {
        units.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let spec = FilterSpec {
            max_price: Some(2000.0),
            min_size: Some(60.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_units(&sample(), &[], &spec)), ["B"]);
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let units = sample();
        assert_eq!(filter_units(&units, &[], &FilterSpec::default()), units);
    }

    #[test]
    fn test_sorted_output_after_filter() {
        let spec = FilterSpec::default().with_sort(SortKey::SizeDesc);
        assert_eq!(ids(&filter_units(&sample(), &[], &spec)), ["C", "B", "A"]);
    }

    #[test]
    fn test_paging_reports_total() {
        let response = UnitSearch::new(FilterSpec::default().with_sort(SortKey::PriceAsc))
            .with_offset(1)
            .with_limit(1)
            .execute(&sample(), &[]);
        assert_eq!(response.total, 3);
        assert_eq!(ids(&response.units), ["B"]);
        assert!(response.has_more());
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let response = UnitSearch::new(FilterSpec::default())
            .with_offset(10)
            .execute(&sample(), &[]);
        assert!(response.is_empty());
        assert_eq!(response.total, 3);
    }

    #[test]
    fn test_params_parse_and_validate() {
        let params = UnitSearchParams {
            floor: Some("0".to_string()),
            max_price: Some("2500.5".to_string()),
            status: Some("coming-soon".to_string()),
            condition: Some("Warm Shell".to_string()),
            min_size: Some("".to_string()),
            sort: Some("price-desc".to_string()),
            ..Default::default()
        };
        let spec = params.to_filter().unwrap();
        assert_eq!(spec.floor, Some(0));
        assert_eq!(spec.max_price, Some(2500.5));
        assert_eq!(spec.status, Some(UnitStatus::ComingSoon));
        assert_eq!(spec.condition, Some(UnitCondition::WarmShell));
        assert_eq!(spec.min_size, None);
        assert_eq!(spec.sort, Some(SortKey::PriceDesc));

        let bad = UnitSearchParams {
            floor: Some("third".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.to_filter(), Err(Error::Validation { .. })));

        let nan = UnitSearchParams {
            max_price: Some("NaN".to_string()),
            ..Default::default()
        };
        assert!(nan.to_filter().is_err());
    }

    #[test]
    fn test_limit_is_clamped() {
        let config = Config::default();
        let search = UnitSearchParams {
            limit: Some("100000".to_string()),
            ..Default::default()
        }
        .into_search(&config)
        .unwrap();
        assert_eq!(search.limit, config.search.max_limit);

        let search = UnitSearchParams::default().into_search(&config).unwrap();
        assert_eq!(search.limit, config.search.default_limit);
    }

    #[test]
    fn test_cache_key_separates_scope_and_page() {
        let base = UnitSearch::new(FilterSpec::default());
        let scoped = base.clone().with_scope(Scope::Upstream(UnitStatus::Available));
        assert_ne!(base.cache_key(), scoped.cache_key());
        assert_ne!(base.cache_key(), base.clone().with_offset(5).cache_key());
    }
}
