//! Data source abstraction over the catalog

use crate::catalog::model::{Building, Unit, UnitQuery};
use crate::core::error::Result;
use async_trait::async_trait;

/// Anything that can serve buildings and units.
///
/// Implemented by the on-disk store, the built-in demo catalog and the
/// HTTP client for a remote leasehub server. Mutating methods may fail with
/// `Error::ReadOnly` or `Error::Unauthorized` depending on the backend.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short backend identifier for logs
    fn name(&self) -> &str;

    async fn list_buildings(&self) -> Result<Vec<Building>>;

    async fn get_building(&self, id: &str) -> Result<Building>;

    /// List units, optionally scoped by the source before any filtering
    async fn list_units(&self, query: Option<&UnitQuery>) -> Result<Vec<Unit>>;

    async fn get_unit(&self, id: &str) -> Result<Unit>;

    async fn create_unit(&self, unit: Unit) -> Result<Unit>;

    async fn update_unit(&self, id: &str, unit: Unit) -> Result<Unit>;

    async fn delete_unit(&self, id: &str) -> Result<()>;

    async fn create_building(&self, building: Building) -> Result<Building>;

    async fn update_building(&self, id: &str, building: Building) -> Result<Building>;

    async fn delete_building(&self, id: &str) -> Result<()>;
}
