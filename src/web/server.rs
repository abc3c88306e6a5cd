//! Axum server for the leasehub JSON API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::cache::ResultCache;
use crate::catalog::{
    Appointment, AppointmentRequest, Building, CatalogSource, JsonStore, Unit, UnitQuery,
    UnitStatus,
};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::nav::{self, Page, Route};
use crate::search::{presets, Scope, SearchResponse, UnitSearch, UnitSearchParams};
use crate::web::{admin, events};

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<JsonStore>,
    pub cache: Arc<Mutex<ResultCache>>,
}

impl AppState {
    pub fn new(config: Config, store: JsonStore) -> Self {
        let cache = ResultCache::new(config.cache.max_queries);
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Drop cached listings after a committed write
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock();
        debug!(entries = cache.len(), "Invalidating result cache");
        cache.invalidate_all();
    }

    /// Run a search through the result cache
    pub async fn search(&self, search: UnitSearch) -> Result<SearchResponse> {
        let key = search.cache_key();
        let generation = {
            let cache = self.cache.lock();
            if let Some(hit) = cache.get(&key) {
                debug!(key = %key, "Result cache hit");
                return Ok(hit);
            }
            cache.generation()
        };

        let units = self
            .store
            .list_units(search.scope.source_query().as_ref())
            .await?;
        let buildings = self.store.list_buildings().await?;
        let response = search.execute(&units, &buildings);

        self.cache
            .lock()
            .put_if_current(generation, key, response.clone());
        Ok(response)
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub buildings: usize,
    pub units: usize,
    pub cached_queries: usize,
}

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    #[serde(default)]
    pub hash: String,
}

#[derive(Debug, Serialize)]
pub struct NavResponse {
    /// False when the hash is malformed and a browser would ignore it
    pub recognized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

// =============================================================================
// PUBLIC HANDLERS
// =============================================================================

/// GET /api/health
async fn api_health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let buildings = state.store.list_buildings().await?.len();
    let units = state.store.list_units(None).await?.len();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        buildings,
        units,
        cached_queries: state.cache.lock().len(),
    }))
}

/// GET /api/buildings
async fn api_buildings(State(state): State<AppState>) -> Result<Json<Vec<Building>>> {
    Ok(Json(state.store.list_buildings().await?))
}

/// GET /api/buildings/:id
async fn api_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Building>> {
    Ok(Json(state.store.get_building(&id).await?))
}

/// GET /api/units - filtered, sorted and paged
async fn api_units(
    State(state): State<AppState>,
    Query(params): Query<UnitSearchParams>,
) -> Result<Json<SearchResponse>> {
    let search = params.into_search(&state.config)?;
    Ok(Json(state.search(search).await?))
}

/// GET /api/units/available - same filters over the available units only
async fn api_available_units(
    State(state): State<AppState>,
    Query(params): Query<UnitSearchParams>,
) -> Result<Json<SearchResponse>> {
    let search = params
        .into_search(&state.config)?
        .with_scope(Scope::Upstream(UnitStatus::Available));
    Ok(Json(state.search(search).await?))
}

/// GET /api/units/:id
async fn api_unit(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Unit>> {
    Ok(Json(state.store.get_unit(&id).await?))
}

/// GET /api/search/:building_id/:floor - one floor of one building
async fn api_floor_search(
    State(state): State<AppState>,
    Path((building_id, floor)): Path<(String, String)>,
) -> Result<Json<SearchResponse>> {
    let floor: i32 = floor
        .parse()
        .map_err(|_| Error::validation(format!("invalid floor '{}'", floor)))?;
    // Unknown buildings are a 404 rather than an empty page
    state.store.get_building(&building_id).await?;
    let search = presets::search_results(&building_id, floor)
        .with_limit(state.config.page_limit(None));
    Ok(Json(state.search(search).await?))
}

/// GET /api/catalog/units - unfiltered source listing for remote clients
async fn api_catalog_units(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> Result<Json<Vec<Unit>>> {
    Ok(Json(state.store.list_units(Some(&query)).await?))
}

/// GET /api/nav?hash= - decode a location hash
async fn api_nav(Query(query): Query<NavQuery>) -> Json<NavResponse> {
    let route = nav::decode(&query.hash);
    Json(NavResponse {
        recognized: route.is_some(),
        page: route.as_ref().map(Route::page),
        canonical: route.as_ref().map(nav::encode),
        route,
    })
}

/// POST /api/appointments
async fn api_create_appointment(
    State(state): State<AppState>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>)> {
    let appointment = state.store.record_appointment(request)?;
    info!(id = %appointment.id, "Appointment received");
    Ok((StatusCode::CREATED, Json(appointment)))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/units", get(admin::list_units).post(admin::create_unit))
        .route(
            "/units/:id",
            put(admin::update_unit).delete(admin::delete_unit),
        )
        .route("/buildings", post(admin::create_building))
        .route(
            "/buildings/:id",
            put(admin::update_building).delete(admin::delete_building),
        )
        .route("/appointments", get(admin::list_appointments))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    let api_routes = Router::new()
        .route("/health", get(api_health))
        .route("/buildings", get(api_buildings))
        .route("/buildings/:id", get(api_building))
        .route("/units", get(api_units))
        .route("/units/available", get(api_available_units))
        .route("/units/:id", get(api_unit))
        .route("/search/:building_id/:floor", get(api_floor_search))
        .route("/catalog/units", get(api_catalog_units))
        .route("/nav", get(api_nav))
        .route("/appointments", post(api_create_appointment))
        .route("/events", get(events::api_events))
        .nest("/admin", admin_routes);

    let permissive_cors = state.config.server.permissive_cors;
    let app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// Open the catalog and serve the API until Ctrl+C
pub async fn run(config: Config, open_browser: bool) -> Result<()> {
    let catalog_path = config.catalog_path()?;
    let store = JsonStore::open_or_seed(&catalog_path, config.catalog.seed_on_empty)?;

    if config.admin.token.is_none() {
        eprintln!("\x1b[33m>\x1b[0m No admin token configured, admin API disabled");
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    let app = router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    let addr = listener.local_addr()?;

    eprintln!();
    eprintln!(
        "\x1b[36m>\x1b[0m leasehub running at \x1b[36mhttp://{}\x1b[0m",
        addr
    );
    eprintln!("\x1b[90m  Catalog: {}\x1b[0m", catalog_path.display());
    eprintln!("\x1b[90m  Press Ctrl+C to stop\x1b[0m");

    if open_browser {
        let url = format!("http://{}/api/health", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
    }
}
