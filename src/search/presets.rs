//! Filter sets behind each listing view

use crate::catalog::model::{UnitCondition, UnitStatus};
use crate::search::filter::FilterSpec;
use crate::search::query::{Scope, UnitSearch};
use crate::search::sort::SortKey;
use tracing::debug;

/// Units on one floor of one building
pub fn search_results(building_id: &str, floor: i32) -> UnitSearch {
    UnitSearch::new(FilterSpec {
        building_id: Some(building_id.to_string()),
        floor: Some(floor),
        ..Default::default()
    })
}

/// Listing values that mean "no filter" in the all-spaces dropdowns
pub(crate) fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("any")
}

/// Every available unit, optionally narrowed by building and condition.
///
/// Availability is scoped at the source. An unrecognized condition label is
/// ignored rather than emptying the listing.
pub fn all_available_spaces(building: Option<&str>, condition: Option<&str>) -> UnitSearch {
    let building_id = building
        .filter(|b| !is_wildcard(b))
        .map(|b| b.trim().to_string());

    let condition = condition
        .filter(|c| !is_wildcard(c))
        .and_then(|c| match c.parse::<UnitCondition>() {
            Ok(condition) => Some(condition),
            Err(_) => {
                debug!(condition = c, "Ignoring unknown condition filter");
                None
            }
        });

    UnitSearch::new(FilterSpec {
        building_id,
        condition,
        ..Default::default()
    })
    .with_scope(Scope::Upstream(UnitStatus::Available))
}

/// Back-office unit table: free text, status, building and sort
pub fn admin_table(
    search_text: Option<&str>,
    status: Option<UnitStatus>,
    building_id: Option<&str>,
    sort: Option<SortKey>,
) -> UnitSearch {
    UnitSearch::new(
        FilterSpec {
            building_id: building_id.map(str::to_string),
            status,
            search_text: search_text.map(str::to_string),
            sort,
            ..Default::default()
        }
        .normalized(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::search::query::filter_units;

    #[test]
    fn test_search_results_scopes_building_and_floor() {
        let search = search_results("crc-corporate-center", 5);
        let hits = filter_units(seed::units(), seed::buildings(), &search.filter);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|u| u.floor == Some(5)
            && u.resolved_building_id().as_deref() == Some("crc-corporate-center")));
    }

    #[test]
    fn test_all_spaces_wildcards() {
        let search = all_available_spaces(Some("all"), Some("All"));
        assert!(search.filter.is_empty());
        assert_eq!(search.scope, Scope::Upstream(UnitStatus::Available));

        let search = all_available_spaces(Some("orchard-plaza"), Some("warm-shell"));
        assert_eq!(search.filter.building_id.as_deref(), Some("orchard-plaza"));
        assert_eq!(search.filter.condition, Some(UnitCondition::WarmShell));
    }

    #[test]
    fn test_all_spaces_ignores_unknown_condition() {
        let search = all_available_spaces(None, Some("penthouse"));
        assert!(search.filter.condition.is_none());
    }

    #[test]
    fn test_admin_table_blank_text() {
        let search = admin_table(Some("  "), Some(UnitStatus::Taken), None, None);
        assert!(search.filter.search_text.is_none());
        assert_eq!(search.filter.status, Some(UnitStatus::Taken));
    }
}
