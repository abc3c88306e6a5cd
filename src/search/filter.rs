//! Unit predicates
//!
//! Every field of [`FilterSpec`] is optional. An absent field matches every
//! unit. A present field is ANDed with the others. A unit that lacks the
//! field a predicate refers to (no price, no floor...) does not match.

use crate::catalog::model::{Building, Unit, UnitCondition, UnitStatus};
use crate::search::sort::SortKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional predicates plus a sort key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    /// Inclusive lower bound on size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    /// Inclusive upper bound on size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    /// Inclusive upper bound on price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<UnitCondition>,
    /// Case-insensitive substring over title, id, building name and location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
}

/// Building id -> display name, used by the free-text predicate
pub struct BuildingNames<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> BuildingNames<'a> {
    pub fn new(buildings: &'a [Building]) -> Self {
        Self {
            names: buildings
                .iter()
                .map(|b| (b.id.as_str(), b.name.as_str()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a str> {
        self.names.get(id).copied()
    }
}

impl FilterSpec {
    /// Blank strings count as absent
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.building_id = blank_to_none(self.building_id);
        self.search_text = blank_to_none(self.search_text);
        self
    }

    /// True when no predicate is set (sorting aside)
    pub fn is_empty(&self) -> bool {
        self.building_id.is_none()
            && self.floor.is_none()
            && self.min_size.is_none()
            && self.max_size.is_none()
            && self.max_price.is_none()
            && self.status.is_none()
            && self.condition.is_none()
            && self.search_text.is_none()
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Evaluate every present predicate against `unit`
    pub fn matches(&self, unit: &Unit, names: &BuildingNames<'_>) -> bool {
        if let Some(ref building_id) = self.building_id {
            if unit.resolved_building_id().as_deref() != Some(building_id.as_str()) {
                return false;
            }
        }

        if let Some(floor) = self.floor {
            if unit.floor != Some(floor) {
                return false;
            }
        }

        if let Some(min) = self.min_size {
            if !unit.size.is_some_and(|size| size >= min) {
                return false;
            }
        }

        if let Some(max) = self.max_size {
            if !unit.size.is_some_and(|size| size <= max) {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if !unit.price.is_some_and(|price| price <= max) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if unit.status != status {
                return false;
            }
        }

        if let Some(condition) = self.condition {
            if unit.condition != Some(condition) {
                return false;
            }
        }

        if let Some(ref text) = self.search_text {
            if !text.trim().is_empty() && !matches_text(unit, text, names) {
                return false;
            }
        }

        true
    }

    /// Stable, readable encoding of the filter (also the cache key stem)
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(ref v) = self.building_id {
            query.append_pair("building", v);
        }
        if let Some(v) = self.floor {
            query.append_pair("floor", &v.to_string());
        }
        if let Some(v) = self.min_size {
            query.append_pair("min_size", &v.to_string());
        }
        if let Some(v) = self.max_size {
            query.append_pair("max_size", &v.to_string());
        }
        if let Some(v) = self.max_price {
            query.append_pair("max_price", &v.to_string());
        }
        if let Some(v) = self.status {
            query.append_pair("status", v.as_str());
        }
        if let Some(v) = self.condition {
            query.append_pair("condition", v.as_str());
        }
        if let Some(ref v) = self.search_text {
            query.append_pair("q", v);
        }
        if let Some(v) = self.sort {
            query.append_pair("sort", v.as_str());
        }
        query.finish()
    }
}

fn matches_text(unit: &Unit, text: &str, names: &BuildingNames<'_>) -> bool {
    let needle = text.trim().to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    if contains(&unit.title) || contains(&unit.id) || contains(&unit.location) {
        return true;
    }

    if unit.building_name.as_deref().is_some_and(contains) {
        return true;
    }

    unit.resolved_building_id()
        .and_then(|id| names.get(&id))
        .is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, price: Option<f64>, size: Option<f64>) -> Unit {
        Unit {
            price,
            size,
            ..Unit::new(id, format!("Suite {}", id), UnitStatus::Available)
        }
    }

    #[test]
    fn test_empty_spec_matches_everything() {
        let spec = FilterSpec::default();
        assert!(spec.is_empty());
        assert!(spec.matches(&unit("A", None, None), &BuildingNames::empty()));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let spec = FilterSpec {
            min_size: Some(80.0),
            max_size: Some(120.0),
            max_price: Some(2000.0),
            ..Default::default()
        };
        let names = BuildingNames::empty();
        assert!(spec.matches(&unit("A", Some(2000.0), Some(80.0)), &names));
        assert!(spec.matches(&unit("B", Some(1.0), Some(120.0)), &names));
        assert!(!spec.matches(&unit("C", Some(2000.01), Some(100.0)), &names));
        assert!(!spec.matches(&unit("D", Some(100.0), Some(79.9)), &names));
    }

    #[test]
    fn test_missing_fields_are_excluded() {
        let names = BuildingNames::empty();
        let by_price = FilterSpec {
            max_price: Some(1_000_000.0),
            ..Default::default()
        };
        assert!(!by_price.matches(&unit("A", None, Some(50.0)), &names));

        let by_floor = FilterSpec {
            floor: Some(0),
            ..Default::default()
        };
        assert!(!by_floor.matches(&unit("A", Some(1.0), Some(1.0)), &names));

        let by_condition = FilterSpec {
            condition: Some(UnitCondition::Bare),
            ..Default::default()
        };
        assert!(!by_condition.matches(&unit("A", None, None), &names));
    }

    #[test]
    fn test_building_uses_prefix_shim_when_unlinked() {
        let names = BuildingNames::empty();
        let spec = FilterSpec {
            building_id: Some("crc-corporate-center".to_string()),
            ..Default::default()
        };
        assert!(spec.matches(&unit("CRC-501", None, None), &names));
        assert!(!spec.matches(&unit("CTP-501", None, None), &names));

        let mut linked = unit("CTP-9", None, None);
        linked.building_id = Some("crc-corporate-center".to_string());
        assert!(spec.matches(&linked, &names));
    }

    #[test]
    fn test_text_matches_resolved_building_name() {
        let buildings = vec![Building::new("orchard-plaza", "Orchard Plaza")];
        let names = BuildingNames::new(&buildings);
        let spec = FilterSpec {
            search_text: Some("ORCHARD".to_string()),
            ..Default::default()
        };
        assert!(spec.matches(&unit("OPL-201", None, None), &names));
        assert!(!spec.matches(&unit("CTP-301", None, None), &names));

        let by_id = FilterSpec {
            search_text: Some("ctp-3".to_string()),
            ..Default::default()
        };
        assert!(by_id.matches(&unit("CTP-301", None, None), &names));
    }

    #[test]
    fn test_normalized_drops_blank_strings() {
        let spec = FilterSpec {
            building_id: Some("  ".to_string()),
            search_text: Some(" suite ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(spec.building_id.is_none());
        assert_eq!(spec.search_text.as_deref(), Some("suite"));
    }

    #[test]
    fn test_query_string_is_stable() {
        let spec = FilterSpec {
            status: Some(UnitStatus::ComingSoon),
            floor: Some(3),
            sort: Some(SortKey::PriceAsc),
            ..Default::default()
        };
        assert_eq!(spec.to_query_string(), "floor=3&status=Coming+Soon&sort=price-asc");
    }
}
