//! Admin back office: bearer-guarded catalog mutations

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::catalog::{Appointment, Building, CatalogSource, Unit, UnitStatus};
use crate::core::error::{Error, Result};
use crate::search::{presets, SearchResponse, SortKey};
use crate::web::server::AppState;

/// Query for the back-office unit table
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminUnitsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub building: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

fn parse_opt<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = Error>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check the `Authorization: Bearer` header against the configured token
pub fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<()> {
    let expected = expected.ok_or(Error::AdminDisabled)?;

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(Error::Unauthorized)?;

    if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

/// Middleware for every `/api/admin` route
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match authorize(state.config.admin.token.as_deref(), request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            warn!(path = %request.uri().path(), error = %e, "Admin request rejected");
            e.into_response()
        }
    }
}

/// GET /api/admin/units - every status, filtered like the back-office table
pub async fn list_units(
    State(state): State<AppState>,
    Query(query): Query<AdminUnitsQuery>,
) -> Result<Json<SearchResponse>> {
    let status: Option<UnitStatus> = parse_opt(query.status.as_deref())?;
    let sort: Option<SortKey> = parse_opt(query.sort.as_deref())?;
    let search = presets::admin_table(
        query.q.as_deref(),
        status,
        query.building.as_deref(),
        sort,
    )
    .with_limit(state.config.page_limit(query.limit));
    Ok(Json(state.search(search).await?))
}

/// POST /api/admin/units
pub async fn create_unit(
    State(state): State<AppState>,
    Json(unit): Json<Unit>,
) -> Result<(StatusCode, Json<Unit>)> {
    let unit = state.store.create_unit(unit).await?;
    state.invalidate();
    Ok((StatusCode::CREATED, Json(unit)))
}

/// PUT /api/admin/units/:id
pub async fn update_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(unit): Json<Unit>,
) -> Result<Json<Unit>> {
    let unit = state.store.update_unit(&id, unit).await?;
    state.invalidate();
    Ok(Json(unit))
}

/// DELETE /api/admin/units/:id
pub async fn delete_unit(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.store.delete_unit(&id).await?;
    state.invalidate();
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/buildings
pub async fn create_building(
    State(state): State<AppState>,
    Json(building): Json<Building>,
) -> Result<(StatusCode, Json<Building>)> {
    let building = state.store.create_building(building).await?;
    state.invalidate();
    Ok((StatusCode::CREATED, Json(building)))
}

/// PUT /api/admin/buildings/:id
pub async fn update_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(building): Json<Building>,
) -> Result<Json<Building>> {
    let building = state.store.update_building(&id, building).await?;
    state.invalidate();
    Ok(Json(building))
}

/// DELETE /api/admin/buildings/:id
pub async fn delete_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store.delete_building(&id).await?;
    state.invalidate();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/appointments
pub async fn list_appointments(State(state): State<AppState>) -> Json<Vec<Appointment>> {
    Json(state.store.appointments())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_no_configured_token_disables_admin() {
        assert!(matches!(
            authorize(None, &bearer("anything")),
            Err(Error::AdminDisabled)
        ));
    }

    #[test]
    fn test_token_checks() {
        assert!(authorize(Some("s3cret"), &bearer("s3cret")).is_ok());
        assert!(matches!(
            authorize(Some("s3cret"), &bearer("guess")),
            Err(Error::Unauthorized)
        ));
        assert!(matches!(
            authorize(Some("s3cret"), &HeaderMap::new()),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
