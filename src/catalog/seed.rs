//! Built-in demo catalog
//!
//! Three buildings with legacy-prefixed units, plus two featured units. Used
//! to seed an empty store and as a read-only source for `--demo` runs.

use crate::catalog::model::{
    Building, BuildingContact, BuildingStat, FloorPlanSummary, Unit, UnitCondition, UnitQuery,
    UnitStatus,
};
use crate::catalog::source::CatalogSource;
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILDINGS: Lazy<Vec<Building>> = Lazy::new(seed_buildings);
static UNITS: Lazy<Vec<Unit>> = Lazy::new(seed_units);

/// Demo buildings
pub fn buildings() -> &'static [Building] {
    &BUILDINGS
}

/// Demo units
pub fn units() -> &'static [Unit] {
    &UNITS
}

fn stat(label: &str, value: &str) -> BuildingStat {
    BuildingStat {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn weekday_hours(weekdays: &str, saturday: &str) -> BTreeMap<String, String> {
    let mut hours = BTreeMap::new();
    hours.insert("Mon-Fri".to_string(), weekdays.to_string());
    hours.insert("Sat".to_string(), saturday.to_string());
    hours
}

fn plan(floor: i32, units: u32, available: u32, total_area: f64, condition: UnitCondition) -> FloorPlanSummary {
    FloorPlanSummary {
        floor,
        units,
        available,
        total_area,
        condition: Some(condition),
    }
}

fn seed_buildings() -> Vec<Building> {
    vec![
        Building {
            location: "Central Business District".to_string(),
            address: "88 Alpha Avenue".to_string(),
            description: vec![
                "A 14-storey Grade A tower at the heart of the business district.".to_string(),
                "Column-free floor plates and direct access to the transit concourse.".to_string(),
            ],
            stats: vec![
                stat("Floors", "14"),
                stat("Typical floor plate", "1,200 sqm"),
                stat("Parking", "320 slots"),
            ],
            hours: weekday_hours("07:00-21:00", "08:00-14:00"),
            contact: BuildingContact {
                phone: Some("+1 555 0100".to_string()),
                email: Some("leasing@ctp-alpha.example".to_string()),
                manager: Some("Alpha Tower Leasing Office".to_string()),
            },
            hero_image: Some("/images/ctp-alpha-tower.jpg".to_string()),
            badge: Some("LEED Gold".to_string()),
            floor_plans: vec![
                plan(3, 2, 2, 360.0, UnitCondition::WarmShell),
                plan(5, 1, 1, 410.0, UnitCondition::Fitted),
                plan(12, 1, 0, 980.0, UnitCondition::Bare),
            ],
            ..Building::new("ctp-alpha-tower", "CTP Alpha Tower")
        },
        Building {
            location: "Riverside".to_string(),
            address: "501 Corporate Drive".to_string(),
            description: vec![
                "Mid-rise corporate campus with river views and a landscaped atrium.".to_string(),
            ],
            stats: vec![stat("Floors", "9"), stat("Backup power", "100%")],
            hours: weekday_hours("08:00-20:00", "closed"),
            contact: BuildingContact {
                phone: Some("+1 555 0150".to_string()),
                email: Some("hello@crc-center.example".to_string()),
                manager: None,
            },
            hero_image: Some("/images/crc-corporate-center.jpg".to_string()),
            badge: None,
            floor_plans: vec![
                plan(1, 1, 1, 150.0, UnitCondition::Fitted),
                plan(5, 2, 1, 300.0, UnitCondition::WarmShell),
                plan(8, 1, 0, 640.0, UnitCondition::Bare),
            ],
            ..Building::new("crc-corporate-center", "CRC Corporate Center")
        },
        Building {
            location: "Orchard District".to_string(),
            address: "12 Orchard Road".to_string(),
            description: vec![
                "Boutique offices above a retail podium, steps from the park.".to_string(),
            ],
            stats: vec![stat("Floors", "6")],
            hours: weekday_hours("08:00-19:00", "09:00-13:00"),
            contact: BuildingContact::default(),
            hero_image: None,
            badge: Some("New".to_string()),
            floor_plans: vec![
                plan(0, 1, 1, 95.0, UnitCondition::Fitted),
                plan(2, 1, 1, 120.0, UnitCondition::WarmShell),
                plan(3, 1, 0, 210.0, UnitCondition::Bare),
            ],
            ..Building::new("orchard-plaza", "Orchard Plaza")
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn unit(
    id: &str,
    title: &str,
    floor: i32,
    size: f64,
    price: f64,
    status: UnitStatus,
    condition: UnitCondition,
    location: &str,
) -> Unit {
    Unit {
        floor: Some(floor),
        size: Some(size),
        capacity: Some((size / 8.0).round() as u32),
        price: Some(price),
        condition: Some(condition),
        location: location.to_string(),
        ..Unit::new(id, title, status)
    }
}

fn seed_units() -> Vec<Unit> {
    use UnitCondition::*;
    use UnitStatus::*;

    let mut units = vec![
        unit("CTP-301", "Suite 301", 3, 180.0, 5400.0, Available, WarmShell, "88 Alpha Avenue"),
        unit("CTP-302", "Suite 302", 3, 180.0, 5200.0, Available, WarmShell, "88 Alpha Avenue"),
        unit("CTP-501", "Suite 501", 5, 410.0, 13500.0, Available, Fitted, "88 Alpha Avenue"),
        unit("CTP-1201", "Full Floor 12", 12, 980.0, 27000.0, Taken, Bare, "88 Alpha Avenue"),
        unit("CRC-101", "Ground Floor Studio", 1, 150.0, 3900.0, Available, Fitted, "501 Corporate Drive"),
        unit("CRC-501", "Suite 501", 5, 160.0, 4300.0, Available, WarmShell, "501 Corporate Drive"),
        unit("CRC-502", "Suite 502", 5, 140.0, 4100.0, ComingSoon, WarmShell, "501 Corporate Drive"),
        unit("CRC-801", "Executive Floor", 8, 640.0, 18500.0, Unavailable, Bare, "501 Corporate Drive"),
        unit("OPL-G01", "Garden Office", 0, 95.0, 2900.0, Available, Fitted, "12 Orchard Road"),
        unit("OPL-201", "Suite 201", 2, 120.0, 3300.0, Available, WarmShell, "12 Orchard Road"),
        unit("OPL-305", "Suite 305", 3, 210.0, 5600.0, Taken, Bare, "12 Orchard Road"),
    ];

    let mut featured_corner = unit(
        "FTR-01",
        "Featured: Corner Suite with Skyline View",
        10,
        260.0,
        8800.0,
        Available,
        Fitted,
        "88 Alpha Avenue",
    );
    featured_corner.building_id = Some("ctp-alpha-tower".to_string());
    featured_corner.description = "Move-in ready corner suite on the 10th floor.".to_string();

    let mut featured_loft = unit(
        "FTR-02",
        "Featured: Park-side Loft",
        4,
        130.0,
        3700.0,
        ComingSoon,
        WarmShell,
        "12 Orchard Road",
    );
    featured_loft.building_id = Some("orchard-plaza".to_string());

    units.push(featured_corner);
    units.push(featured_loft);

    for unit in &mut units {
        if unit.building_name.is_none() {
            unit.building_name = unit
                .resolved_building_id()
                .and_then(|id| BUILDINGS.iter().find(|b| b.id == id.as_ref()))
                .map(|b| b.name.clone());
        }
    }

    units
}

// =============================================================================
// READ-ONLY SOURCE
// =============================================================================

/// The demo catalog as a read-only [`CatalogSource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

#[async_trait]
impl CatalogSource for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_buildings(&self) -> Result<Vec<Building>> {
        Ok(buildings().to_vec())
    }

    async fn get_building(&self, id: &str) -> Result<Building> {
        buildings()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| Error::building_not_found(id))
    }

    async fn list_units(&self, query: Option<&UnitQuery>) -> Result<Vec<Unit>> {
        Ok(units()
            .iter()
            .filter(|u| query.map_or(true, |q| q.matches(u)))
            .cloned()
            .collect())
    }

    async fn get_unit(&self, id: &str) -> Result<Unit> {
        units()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Error::unit_not_found(id))
    }

    async fn create_unit(&self, _unit: Unit) -> Result<Unit> {
        Err(Error::ReadOnly)
    }

    async fn update_unit(&self, _id: &str, _unit: Unit) -> Result<Unit> {
        Err(Error::ReadOnly)
    }

    async fn delete_unit(&self, _id: &str) -> Result<()> {
        Err(Error::ReadOnly)
    }

    async fn create_building(&self, _building: Building) -> Result<Building> {
        Err(Error::ReadOnly)
    }

    async fn update_building(&self, _id: &str, _building: Building) -> Result<Building> {
        Err(Error::ReadOnly)
    }

    async fn delete_building(&self, _id: &str) -> Result<()> {
        Err(Error::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_unit_resolves_to_a_seeded_building() {
        for unit in units() {
            let building = unit
                .resolved_building_id()
                .unwrap_or_else(|| panic!("{} has no building", unit.id));
            assert!(
                buildings().iter().any(|b| b.id == building.as_ref()),
                "{} points at unknown building {}",
                unit.id,
                building
            );
            assert!(unit.validate().is_ok());
        }
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let mut ids: Vec<&str> = units().iter().map(|u| u.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), units().len());
    }

    #[tokio::test]
    async fn test_static_catalog_is_read_only() {
        let catalog = StaticCatalog;
        let unit = catalog.get_unit("CRC-501").await.unwrap();
        assert_eq!(unit.building_name.as_deref(), Some("CRC Corporate Center"));
        assert!(matches!(
            catalog.delete_unit("CRC-501").await,
            Err(Error::ReadOnly)
        ));
        assert!(catalog.get_unit("NOPE-1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_static_catalog_upstream_scope() {
        let available = StaticCatalog
            .list_units(Some(&UnitQuery::available()))
            .await
            .unwrap();
        assert!(!available.is_empty());
        assert!(available.iter().all(Unit::is_available));
    }
}
