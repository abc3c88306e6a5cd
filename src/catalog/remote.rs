//! HTTP client for a remote leasehub server
//!
//! Speaks the JSON API served by [`crate::web`]. Mutations carry the admin
//! bearer token when one is configured. The client does not refresh or
//! validate it; a rejected token surfaces as `Error::Unauthorized`.

use crate::catalog::model::{Building, Unit, UnitQuery};
use crate::catalog::source::CatalogSource;
use crate::core::error::{EntityKind, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Request timeout in seconds
const TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `CatalogSource` backed by the REST API
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the admin bearer token to mutating requests
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Remote catalog request");
        self.client.request(method, self.url(path))
    }

    fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.request(method, path);
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success response onto the error taxonomy
    async fn check(response: Response, kind: EntityKind, id: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
        };

        Err(match status {
            StatusCode::NOT_FOUND => Error::NotFound {
                kind,
                id: id.to_string(),
            },
            StatusCode::UNAUTHORIZED => Error::Unauthorized,
            StatusCode::FORBIDDEN => Error::AdminDisabled,
            StatusCode::BAD_REQUEST => Error::Validation { message },
            StatusCode::CONFLICT => Error::AlreadyExists {
                kind,
                id: id.to_string(),
            },
            _ => Error::Remote {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        kind: EntityKind,
        id: &str,
    ) -> Result<T> {
        let response = Self::check(builder.send().await?, kind, id).await?;
        Ok(response.json::<T>().await?)
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list_buildings(&self) -> Result<Vec<Building>> {
        self.fetch(
            self.request(Method::GET, "/api/buildings"),
            EntityKind::Building,
            "",
        )
        .await
    }

    async fn get_building(&self, id: &str) -> Result<Building> {
        let path = format!("/api/buildings/{}", segment(id));
        self.fetch(self.request(Method::GET, &path), EntityKind::Building, id)
            .await
    }

    async fn list_units(&self, query: Option<&UnitQuery>) -> Result<Vec<Unit>> {
        let mut builder = self.request(Method::GET, "/api/catalog/units");
        if let Some(query) = query {
            builder = builder.query(query);
        }
        self.fetch(builder, EntityKind::Unit, "").await
    }

    async fn get_unit(&self, id: &str) -> Result<Unit> {
        let path = format!("/api/units/{}", segment(id));
        self.fetch(self.request(Method::GET, &path), EntityKind::Unit, id)
            .await
    }

    async fn create_unit(&self, unit: Unit) -> Result<Unit> {
        let id = unit.id.clone();
        let builder = self.admin(Method::POST, "/api/admin/units").json(&unit);
        self.fetch(builder, EntityKind::Unit, &id).await
    }

    async fn update_unit(&self, id: &str, unit: Unit) -> Result<Unit> {
        let path = format!("/api/admin/units/{}", segment(id));
        let builder = self.admin(Method::PUT, &path).json(&unit);
        self.fetch(builder, EntityKind::Unit, id).await
    }

    async fn delete_unit(&self, id: &str) -> Result<()> {
        let path = format!("/api/admin/units/{}", segment(id));
        let response = self.admin(Method::DELETE, &path).send().await?;
        Self::check(response, EntityKind::Unit, id).await?;
        Ok(())
    }

    async fn create_building(&self, building: Building) -> Result<Building> {
        let id = building.id.clone();
        let builder = self
            .admin(Method::POST, "/api/admin/buildings")
            .json(&building);
        self.fetch(builder, EntityKind::Building, &id).await
    }

    async fn update_building(&self, id: &str, building: Building) -> Result<Building> {
        let path = format!("/api/admin/buildings/{}", segment(id));
        let builder = self.admin(Method::PUT, &path).json(&building);
        self.fetch(builder, EntityKind::Building, id).await
    }

    async fn delete_building(&self, id: &str) -> Result<()> {
        let path = format!("/api/admin/buildings/{}", segment(id));
        let response = self.admin(Method::DELETE, &path).send().await?;
        Self::check(response, EntityKind::Building, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let catalog = HttpCatalog::new("http://localhost:3000/").unwrap();
        assert_eq!(catalog.url("/api/buildings"), "http://localhost:3000/api/buildings");
    }

    #[test]
    fn test_ids_are_path_encoded() {
        assert_eq!(segment("CRC 501/a"), "CRC%20501%2Fa");
    }
}
