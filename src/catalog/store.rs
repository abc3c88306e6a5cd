//! File-backed catalog store
//!
//! The catalog lives in a single JSON document. Rows mirror the relational
//! layout the admin back office was built against: scalar columns are typed,
//! structured sub-objects are serialized text decoded through
//! [`crate::catalog::columns`].

use crate::catalog::appointment::{Appointment, AppointmentRequest};
use crate::catalog::columns;
use crate::catalog::events::{CatalogEvent, CatalogEvents, ChangeAction};
use crate::catalog::model::{Building, Unit, UnitCondition, UnitQuery, UnitStatus};
use crate::catalog::seed;
use crate::catalog::source::CatalogSource;
use crate::core::error::{EntityKind, Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FORMAT_VERSION: u32 = 1;

// =============================================================================
// ROWS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct BuildingRow {
    id: String,
    name: String,
    location: String,
    address: String,
    description: Option<String>,
    stats: Option<String>,
    hours: Option<String>,
    contact: Option<String>,
    hero_image: Option<String>,
    badge: Option<String>,
    floor_plans: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UnitRow {
    id: String,
    title: String,
    building_id: Option<String>,
    building_name: Option<String>,
    floor: Option<i32>,
    size: Option<f64>,
    capacity: Option<u32>,
    price: Option<f64>,
    status: String,
    condition: Option<String>,
    location: String,
    images: Option<String>,
    description: String,
    floor_plan: Option<String>,
    availability: Option<String>,
}

impl BuildingRow {
    fn from_building(building: &Building) -> Self {
        Self {
            id: building.id.clone(),
            name: building.name.clone(),
            location: building.location.clone(),
            address: building.address.clone(),
            description: Some(columns::encode(&building.description)),
            stats: Some(columns::encode(&building.stats)),
            hours: Some(columns::encode(&building.hours)),
            contact: Some(columns::encode(&building.contact)),
            hero_image: building.hero_image.clone(),
            badge: building.badge.clone(),
            floor_plans: Some(columns::encode(&building.floor_plans)),
        }
    }

    fn to_building(&self) -> Building {
        Building {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            address: self.address.clone(),
            description: columns::decode_paragraphs(self.description.as_deref()),
            stats: columns::decode_stats(self.stats.as_deref()),
            hours: columns::decode_hours(self.hours.as_deref()),
            contact: columns::decode_contact(self.contact.as_deref()),
            hero_image: self.hero_image.clone().filter(|s| !s.is_empty()),
            badge: self.badge.clone().filter(|s| !s.is_empty()),
            floor_plans: columns::decode_floor_plans(self.floor_plans.as_deref()),
        }
    }
}

impl UnitRow {
    fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id.clone(),
            title: unit.title.clone(),
            building_id: unit.building_id.clone(),
            building_name: unit.building_name.clone(),
            floor: unit.floor,
            size: unit.size,
            capacity: unit.capacity,
            price: unit.price,
            status: unit.status.as_str().to_string(),
            condition: unit.condition.map(|c| c.as_str().to_string()),
            location: unit.location.clone(),
            images: Some(columns::encode(&unit.images)),
            description: unit.description.clone(),
            floor_plan: Some(columns::encode(&unit.floor_plan)),
            availability: Some(columns::encode(&unit.availability)),
        }
    }

    fn to_unit(&self) -> Unit {
        // An unreadable status must not advertise the unit as leasable
        let status = self.status.parse::<UnitStatus>().unwrap_or_else(|_| {
            warn!(unit = %self.id, status = %self.status, "Unknown unit status, treating as Unavailable");
            UnitStatus::Unavailable
        });
        let condition = self
            .condition
            .as_deref()
            .filter(|c| !c.is_empty())
            .and_then(|c| c.parse::<UnitCondition>().ok());

        Unit {
            id: self.id.clone(),
            title: self.title.clone(),
            building_id: self.building_id.clone().filter(|s| !s.is_empty()),
            building_name: self.building_name.clone(),
            floor: self.floor,
            size: self.size,
            capacity: self.capacity,
            price: self.price,
            status,
            condition,
            location: self.location.clone(),
            images: columns::decode_images(self.images.as_deref()),
            description: self.description.clone(),
            floor_plan: columns::decode_blob("floor_plan", self.floor_plan.as_deref()),
            availability: columns::decode_blob("availability", self.availability.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    version: u32,
    buildings: Vec<BuildingRow>,
    units: Vec<UnitRow>,
    appointments: Vec<Appointment>,
}

// =============================================================================
// STORE
// =============================================================================

/// JSON-file catalog with in-memory rows and write-through persistence
pub struct JsonStore {
    path: PathBuf,
    data: RwLock<CatalogFile>,
    events: CatalogEvents,
}

impl JsonStore {
    /// Open the store at `path`. A missing file is an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: CatalogFile = serde_json::from_str(&content)?;
            if file.version > FORMAT_VERSION {
                warn!(path = %path.display(), version = file.version, "Catalog written by a newer version");
            }
            file
        } else {
            CatalogFile {
                version: FORMAT_VERSION,
                ..Default::default()
            }
        };

        info!(
            path = %path.display(),
            buildings = data.buildings.len(),
            units = data.units.len(),
            "Opened catalog"
        );

        Ok(Self {
            path,
            data: RwLock::new(data),
            events: CatalogEvents::default(),
        })
    }

    /// Open the store and fill it with the demo catalog if it is empty
    pub fn open_or_seed(path: impl Into<PathBuf>, seed_on_empty: bool) -> Result<Self> {
        let store = Self::open(path)?;
        if seed_on_empty && store.is_empty() {
            store.replace_all(seed::buildings(), seed::units())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        let data = self.data.read();
        data.buildings.is_empty() && data.units.is_empty()
    }

    pub fn events(&self) -> &CatalogEvents {
        &self.events
    }

    /// Replace every building and unit (appointments are kept)
    pub fn replace_all(&self, buildings: &[Building], units: &[Unit]) -> Result<()> {
        self.write(|data| {
            data.buildings = buildings.iter().map(BuildingRow::from_building).collect();
            data.units = units.iter().map(UnitRow::from_unit).collect();
            Ok(())
        })?;
        info!(buildings = buildings.len(), units = units.len(), "Catalog replaced");
        self.events.broadcast(CatalogEvent::Reloaded {
            buildings: buildings.len(),
            units: units.len(),
        });
        Ok(())
    }

    /// Validate and store a scheduling request
    pub fn record_appointment(&self, request: AppointmentRequest) -> Result<Appointment> {
        let appointment = request.accept(Utc::now())?;
        self.write(|data| {
            data.appointments.push(appointment.clone());
            Ok(())
        })?;
        self.events.broadcast(CatalogEvent::AppointmentReceived {
            id: appointment.id.to_string(),
        });
        Ok(appointment)
    }

    /// Stored appointments, newest first
    pub fn appointments(&self) -> Vec<Appointment> {
        let mut list = self.data.read().appointments.clone();
        list.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        list
    }

    /// Write the document atomically (temp file + rename)
    fn persist(&self, data: &CatalogFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(data)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Catalog persisted");
        Ok(())
    }

    /// Run a write against a copy of the rows. The copy replaces the live
    /// rows only once it is on disk.
    fn write<T>(&self, apply: impl FnOnce(&mut CatalogFile) -> Result<T>) -> Result<T> {
        let mut data = self.data.write();
        let mut draft = data.clone();
        let value = apply(&mut draft)?;
        self.persist(&draft)?;
        *data = draft;
        Ok(value)
    }
}

fn conflict(kind: EntityKind, id: &str) -> Error {
    Error::AlreadyExists {
        kind,
        id: id.to_string(),
    }
}

#[async_trait]
impl CatalogSource for JsonStore {
    fn name(&self) -> &str {
        "store"
    }

    async fn list_buildings(&self) -> Result<Vec<Building>> {
        Ok(self
            .data
            .read()
            .buildings
            .iter()
            .map(BuildingRow::to_building)
            .collect())
    }

    async fn get_building(&self, id: &str) -> Result<Building> {
        self.data
            .read()
            .buildings
            .iter()
            .find(|row| row.id == id)
            .map(BuildingRow::to_building)
            .ok_or_else(|| Error::building_not_found(id))
    }

    async fn list_units(&self, query: Option<&UnitQuery>) -> Result<Vec<Unit>> {
        Ok(self
            .data
            .read()
            .units
            .iter()
            .map(UnitRow::to_unit)
            .filter(|unit| query.map_or(true, |q| q.matches(unit)))
            .collect())
    }

    async fn get_unit(&self, id: &str) -> Result<Unit> {
        self.data
            .read()
            .units
            .iter()
            .find(|row| row.id == id)
            .map(UnitRow::to_unit)
            .ok_or_else(|| Error::unit_not_found(id))
    }

    async fn create_unit(&self, unit: Unit) -> Result<Unit> {
        unit.validate()?;
        self.write(|data| {
            if data.units.iter().any(|row| row.id == unit.id) {
                return Err(conflict(EntityKind::Unit, &unit.id));
            }
            if let Some(ref building_id) = unit.building_id {
                if !data.buildings.iter().any(|b| &b.id == building_id) {
                    return Err(Error::building_not_found(building_id));
                }
            }
            data.units.push(UnitRow::from_unit(&unit));
            Ok(())
        })?;
        info!(unit = %unit.id, "Unit created");
        self.events.unit_changed(&unit.id, ChangeAction::Created);
        Ok(unit)
    }

    async fn update_unit(&self, id: &str, unit: Unit) -> Result<Unit> {
        unit.validate()?;
        if unit.id != id {
            return Err(Error::validation(format!(
                "unit id in body ({}) does not match path ({})",
                unit.id, id
            )));
        }
        self.write(|data| {
            let row = data
                .units
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| Error::unit_not_found(id))?;
            *row = UnitRow::from_unit(&unit);
            Ok(())
        })?;
        info!(unit = %id, "Unit updated");
        self.events.unit_changed(id, ChangeAction::Updated);
        Ok(unit)
    }

    async fn delete_unit(&self, id: &str) -> Result<()> {
        self.write(|data| {
            let before = data.units.len();
            data.units.retain(|row| row.id != id);
            if data.units.len() == before {
                return Err(Error::unit_not_found(id));
            }
            Ok(())
        })?;
        info!(unit = %id, "Unit deleted");
        self.events.unit_changed(id, ChangeAction::Deleted);
        Ok(())
    }

    async fn create_building(&self, building: Building) -> Result<Building> {
        building.validate()?;
        self.write(|data| {
            if data.buildings.iter().any(|row| row.id == building.id) {
                return Err(conflict(EntityKind::Building, &building.id));
            }
            data.buildings.push(BuildingRow::from_building(&building));
            Ok(())
        })?;
        info!(building = %building.id, "Building created");
        self.events
            .building_changed(&building.id, ChangeAction::Created);
        Ok(building)
    }

    async fn update_building(&self, id: &str, building: Building) -> Result<Building> {
        building.validate()?;
        if building.id != id {
            return Err(Error::validation(format!(
                "building id in body ({}) does not match path ({})",
                building.id, id
            )));
        }
        self.write(|data| {
            let row = data
                .buildings
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| Error::building_not_found(id))?;
            *row = BuildingRow::from_building(&building);
            Ok(())
        })?;
        info!(building = %id, "Building updated");
        self.events.building_changed(id, ChangeAction::Updated);
        Ok(building)
    }

    async fn delete_building(&self, id: &str) -> Result<()> {
        self.write(|data| {
            if !data.buildings.iter().any(|row| row.id == id) {
                return Err(Error::building_not_found(id));
            }
            let occupied = data
                .units
                .iter()
                .map(UnitRow::to_unit)
                .filter(|unit| unit.resolved_building_id().as_deref() == Some(id))
                .count();
            if occupied > 0 {
                return Err(Error::validation(format!(
                    "building {} still has {} unit(s)",
                    id, occupied
                )));
            }
            data.buildings.retain(|row| row.id != id);
            Ok(())
        })?;
        info!(building = %id, "Building deleted");
        self.events.building_changed(id, ChangeAction::Deleted);
        Ok(())
    }
}
