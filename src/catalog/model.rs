//! Catalog entities: buildings, units and their enumerations

use crate::catalog::legacy;
use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Leasing availability of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    Available,
    #[serde(rename = "Coming Soon")]
    ComingSoon,
    Taken,
    Unavailable,
}

/// Build-out state of a unit, independent of its leasing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCondition {
    Bare,
    #[serde(rename = "Warm Shell")]
    WarmShell,
    Fitted,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 4] = [
        UnitStatus::Available,
        UnitStatus::ComingSoon,
        UnitStatus::Taken,
        UnitStatus::Unavailable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::ComingSoon => "Coming Soon",
            Self::Taken => "Taken",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl UnitCondition {
    pub const ALL: [UnitCondition; 3] = [
        UnitCondition::Bare,
        UnitCondition::WarmShell,
        UnitCondition::Fitted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bare => "Bare",
            Self::WarmShell => "Warm Shell",
            Self::Fitted => "Fitted",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase and drop separators so "Coming Soon", "coming-soon" and
/// "coming_soon" all compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for UnitStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize_label(status.as_str()) == wanted)
            .ok_or_else(|| Error::validation(format!("unknown unit status '{}'", s)))
    }
}

impl FromStr for UnitCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|condition| normalize_label(condition.as_str()) == wanted)
            .ok_or_else(|| Error::validation(format!("unknown unit condition '{}'", s)))
    }
}

// =============================================================================
// UNIT
// =============================================================================

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A leasable office unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    /// Explicit building reference. Legacy catalog entries leave this empty
    /// and rely on the id prefix instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    /// 0 = ground floor
    #[serde(default)]
    pub floor: Option<i32>,
    /// Floor area in square meters
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Monthly asking rent
    #[serde(default)]
    pub price: Option<f64>,
    pub status: UnitStatus,
    #[serde(default)]
    pub condition: Option<UnitCondition>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object")]
    pub floor_plan: serde_json::Value,
    #[serde(default = "empty_object")]
    pub availability: serde_json::Value,
}

impl Unit {
    /// Minimal unit with the given id, title and status
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: UnitStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            building_id: None,
            building_name: None,
            floor: None,
            size: None,
            capacity: None,
            price: None,
            status,
            condition: None,
            location: String::new(),
            images: Vec::new(),
            description: String::new(),
            floor_plan: empty_object(),
            availability: empty_object(),
        }
    }

    /// Building this unit belongs to: the explicit reference when present,
    /// otherwise whatever the legacy id prefix maps to.
    pub fn resolved_building_id(&self) -> Option<Cow<'_, str>> {
        match self.building_id.as_deref() {
            Some(id) if !id.is_empty() => Some(Cow::Borrowed(id)),
            _ => legacy::building_for_unit(&self.id).map(Cow::Borrowed),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("unit id must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::validation("unit title must not be empty"));
        }
        if self.size.is_some_and(|s| !s.is_finite() || s < 0.0) {
            return Err(Error::validation("unit size must be a non-negative number"));
        }
        if self.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(Error::validation("unit price must be a non-negative number"));
        }
        Ok(())
    }
}

// =============================================================================
// BUILDING
// =============================================================================

/// Headline figure shown on a building page ("Floors: 12")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingStat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingContact {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager: Option<String>,
}

/// Per-floor summary row of a building's floor plan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanSummary {
    pub floor: i32,
    #[serde(default)]
    pub units: u32,
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub total_area: f64,
    #[serde(default)]
    pub condition: Option<UnitCondition>,
}

/// An office building with its marketing content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    /// Description paragraphs
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub stats: Vec<BuildingStat>,
    /// Day (or day range) -> opening hours
    #[serde(default)]
    pub hours: BTreeMap<String, String>,
    #[serde(default)]
    pub contact: BuildingContact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default)]
    pub floor_plans: Vec<FloorPlanSummary>,
}

/// Page hashes that are not building pages
const RESERVED_BUILDING_IDS: &[&str] = &[
    "home",
    "about",
    "services",
    "contact",
    "properties",
    "tenant-portal",
    "schedule-appointment",
    "modern-management-team",
    "all-available-spaces",
];

/// Hash prefixes (before the first `-`) that decode to other pages
const ROUTED_PREFIXES: &[&str] = &[
    "about",
    "services",
    "contact",
    "sustainability",
    "tenant",
    "unit",
    "search",
];

/// True when `#<id>` would not open the building page for `id`
fn routes_elsewhere(id: &str) -> bool {
    if RESERVED_BUILDING_IDS.contains(&id) || id.starts_with("all-available-spaces?") {
        return true;
    }
    id.split_once('-')
        .map_or(false, |(head, _)| ROUTED_PREFIXES.contains(&head))
}

impl Building {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: String::new(),
            address: String::new(),
            description: Vec::new(),
            stats: Vec::new(),
            hours: BTreeMap::new(),
            contact: BuildingContact::default(),
            hero_image: None,
            badge: None,
            floor_plans: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("building id must not be empty"));
        }
        if self.id.chars().any(|c| c.is_whitespace() || matches!(c, '#' | '?' | '/')) {
            return Err(Error::validation(format!(
                "building id '{}' contains characters not allowed in a page link",
                self.id
            )));
        }
        if routes_elsewhere(&self.id) {
            return Err(Error::validation(format!(
                "building id '{}' collides with another page link",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::validation("building name must not be empty"));
        }
        Ok(())
    }

    /// Total and available unit counts across the floor plan table
    pub fn unit_counts(&self) -> (u32, u32) {
        self.floor_plans
            .iter()
            .fold((0, 0), |(units, available), plan| {
                (units + plan.units, available + plan.available)
            })
    }
}

// =============================================================================
// DATA SOURCE QUERY
// =============================================================================

/// Scoping a data source applies before results reach the filter pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
}

impl UnitQuery {
    pub fn available() -> Self {
        Self {
            building_id: None,
            status: Some(UnitStatus::Available),
        }
    }

    pub fn in_building(building_id: impl Into<String>) -> Self {
        Self {
            building_id: Some(building_id.into()),
            status: None,
        }
    }

    pub fn matches(&self, unit: &Unit) -> bool {
        if let Some(status) = self.status {
            if unit.status != status {
                return false;
            }
        }
        if let Some(ref building_id) = self.building_id {
            if unit.resolved_building_id().as_deref() != Some(building_id.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_lenient() {
        assert_eq!("Coming Soon".parse::<UnitStatus>().unwrap(), UnitStatus::ComingSoon);
        assert_eq!("coming-soon".parse::<UnitStatus>().unwrap(), UnitStatus::ComingSoon);
        assert_eq!("AVAILABLE".parse::<UnitStatus>().unwrap(), UnitStatus::Available);
        assert_eq!("warm_shell".parse::<UnitCondition>().unwrap(), UnitCondition::WarmShell);
        assert!("leased".parse::<UnitStatus>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&UnitStatus::ComingSoon).unwrap();
        assert_eq!(json, "\"Coming Soon\"");
        let cond: UnitCondition = serde_json::from_str("\"Warm Shell\"").unwrap();
        assert_eq!(cond, UnitCondition::WarmShell);
    }

    #[test]
    fn test_resolved_building_prefers_foreign_key() {
        let mut unit = Unit::new("CRC-501", "Suite 501", UnitStatus::Available);
        assert_eq!(
            unit.resolved_building_id().as_deref(),
            Some("crc-corporate-center")
        );

        unit.building_id = Some("orchard-plaza".to_string());
        assert_eq!(unit.resolved_building_id().as_deref(), Some("orchard-plaza"));

        let orphan = Unit::new("X-1", "Orphan", UnitStatus::Taken);
        assert!(orphan.resolved_building_id().is_none());
    }

    #[test]
    fn test_unit_defaults_when_fields_missing() {
        let unit: Unit =
            serde_json::from_str(r#"{"id":"U1","title":"Loft","status":"Taken"}"#).unwrap();
        assert!(unit.floor.is_none());
        assert!(unit.price.is_none());
        assert!(unit.floor_plan.is_object());
    }

    #[test]
    fn test_unit_validation() {
        let mut unit = Unit::new("U1", "Loft", UnitStatus::Available);
        assert!(unit.validate().is_ok());
        unit.price = Some(-5.0);
        assert!(unit.validate().is_err());
    }

    #[test]
    fn test_building_id_must_be_linkable() {
        assert!(Building::new("north-tower", "North Tower").validate().is_ok());
        assert!(Building::new("north tower", "North Tower").validate().is_err());
        assert!(Building::new("a#b", "North Tower").validate().is_err());
    }

    #[test]
    fn test_building_id_must_not_shadow_other_pages() {
        for id in [
            "home",
            "properties",
            "tenant-tower",
            "about-x",
            "unit-x",
            "search-x-1",
            "sustainability-park",
        ] {
            assert!(Building::new(id, "Shadow").validate().is_err(), "{id}");
        }
        for id in ["orchard-plaza", "ctp-alpha-tower", "tenants-hall", "homestead"] {
            assert!(Building::new(id, "Fine").validate().is_ok(), "{id}");
        }
    }

    #[test]
    fn test_unit_query_scoping() {
        let mut unit = Unit::new("OPL-201", "Suite 201", UnitStatus::Available);
        assert!(UnitQuery::available().matches(&unit));
        assert!(UnitQuery::in_building("orchard-plaza").matches(&unit));
        assert!(!UnitQuery::in_building("ctp-alpha-tower").matches(&unit));

        unit.status = UnitStatus::Taken;
        assert!(!UnitQuery::available().matches(&unit));
    }
}
