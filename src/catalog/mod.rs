//! Catalog data: buildings, units and the sources that serve them

pub mod appointment;
pub mod columns;
pub mod events;
pub mod legacy;
pub mod model;
pub mod remote;
pub mod seed;
pub mod source;
pub mod store;

pub use appointment::{Appointment, AppointmentRequest};
pub use events::{CatalogEvent, CatalogEvents, ChangeAction};
pub use model::{
    Building, BuildingContact, BuildingStat, FloorPlanSummary, Unit, UnitCondition, UnitQuery,
    UnitStatus,
};
pub use remote::HttpCatalog;
pub use seed::StaticCatalog;
pub use source::CatalogSource;
pub use store::JsonStore;
