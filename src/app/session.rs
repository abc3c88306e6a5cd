//! Headless page session
//!
//! Combines the navigator with catalog loads. The outer adapter feeds
//! [`Input`]s, writes back any hash the transition asks for, runs the
//! returned [`PendingLoad`] against a data source and hands the result to
//! [`Session::complete`]. Results for superseded navigations are dropped.

use crate::app::view::View;
use crate::catalog::model::UnitQuery;
use crate::catalog::source::CatalogSource;
use crate::core::error::{Error, Result};
use crate::nav::{
    back, AllSpacesFilters, LatestFetch, NavEvent, Navigator, Page, Route, SearchParams, Ticket,
    Transition,
};
use crate::search::presets;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Something the user or the browser did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(NavEvent),
    Navigate(Route),
    Back,
    BackFromUnit,
    /// Reload the current page after an error
    Retry,
}

impl FromStr for Input {
    type Err = Error;

    /// `#hash` is a hash change, `pop:#hash` a history event, and `back`,
    /// `back-unit` and `retry` are the matching actions.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "back" => Ok(Input::Back),
            "back-unit" => Ok(Input::BackFromUnit),
            "retry" => Ok(Input::Retry),
            _ => {
                if let Some(hash) = s.strip_prefix("pop:") {
                    Ok(Input::Event(NavEvent::PopState(hash.to_string())))
                } else if s.is_empty() || s.starts_with('#') {
                    Ok(Input::Event(NavEvent::HashChange(s.to_string())))
                } else {
                    Err(Error::validation(format!(
                        "unrecognized navigation input '{}' (expected #hash, pop:#hash, back, back-unit or retry)",
                        s
                    )))
                }
            }
        }
    }
}

/// Data a page needs
#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    Properties,
    Building(String),
    Unit(String),
    Search(SearchParams),
    AllSpaces(Option<AllSpacesFilters>),
}

impl LoadRequest {
    fn for_route(route: &Route) -> Option<Self> {
        match route {
            Route::Properties => Some(LoadRequest::Properties),
            Route::Building(id) => Some(LoadRequest::Building(id.clone())),
            Route::UnitDetails(id) => Some(LoadRequest::Unit(id.clone())),
            Route::SearchResults(params) => Some(LoadRequest::Search(params.clone())),
            Route::AllAvailableSpaces(filters) => Some(LoadRequest::AllSpaces(filters.clone())),
            _ => None,
        }
    }

    /// Target key for the stale-load guard
    fn target(&self) -> String {
        match self {
            LoadRequest::Properties => "properties".to_string(),
            LoadRequest::Building(id) => format!("building:{}", id),
            LoadRequest::Unit(id) => format!("unit:{}", id),
            LoadRequest::Search(p) => format!("search:{}:{}", p.building_id, p.floor),
            LoadRequest::AllSpaces(filters) => format!("all-spaces:{:?}", filters),
        }
    }

    async fn fetch(&self, source: &dyn CatalogSource) -> Result<View> {
        match self {
            LoadRequest::Properties => Ok(View::Properties {
                buildings: source.list_buildings().await?,
            }),
            LoadRequest::Building(id) => {
                let building = source.get_building(id).await?;
                let units = source
                    .list_units(Some(&UnitQuery::in_building(id.as_str())))
                    .await?;
                Ok(View::Building { building, units })
            }
            LoadRequest::Unit(id) => Ok(View::Unit {
                unit: source.get_unit(id).await?,
            }),
            LoadRequest::Search(params) => {
                source.get_building(&params.building_id).await?;
                let search = presets::search_results(&params.building_id, params.floor);
                let units = source.list_units(None).await?;
                let buildings = source.list_buildings().await?;
                Ok(View::SearchResults {
                    params: params.clone(),
                    results: search.execute(&units, &buildings),
                })
            }
            LoadRequest::AllSpaces(filters) => {
                let (building, condition) = match filters {
                    Some(f) => (f.building.as_deref(), f.condition.as_deref()),
                    None => (None, None),
                };
                if let Some(id) = building.filter(|b| !presets::is_wildcard(b)) {
                    source.get_building(id.trim()).await?;
                }
                let search = presets::all_available_spaces(building, condition);
                let units = source.list_units(search.scope.source_query().as_ref()).await?;
                let buildings = source.list_buildings().await?;
                Ok(View::AllSpaces {
                    filters: filters.clone(),
                    results: search.execute(&units, &buildings),
                })
            }
        }
    }
}

/// A load the adapter must run
#[derive(Debug, Clone)]
pub struct PendingLoad {
    ticket: Ticket,
    pub request: LoadRequest,
    retry: Route,
    back: Route,
}

/// A finished load, ready for [`Session::complete`]
#[derive(Debug, Clone)]
pub struct Loaded {
    ticket: Ticket,
    pub view: View,
}

impl PendingLoad {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Run the load. Missing entities become a not-found view and any other
    /// failure an error view with a retry route; this never fails itself.
    pub async fn load(self, source: &dyn CatalogSource) -> Loaded {
        let view = match self.request.fetch(source).await {
            Ok(view) => view,
            Err(e) if e.is_not_found() => View::NotFound {
                message: e.to_string(),
                back: self.back,
            },
            Err(e) => {
                warn!(source = source.name(), error = %e, "Page load failed");
                View::Error {
                    message: e.to_string(),
                    retry: self.retry,
                }
            }
        };
        Loaded {
            ticket: self.ticket,
            view,
        }
    }
}

/// Result of one [`Session::dispatch`]
#[derive(Debug)]
pub struct Dispatched {
    pub transition: Transition,
    pub load: Option<PendingLoad>,
}

pub struct Session {
    navigator: Navigator,
    fetch: LatestFetch,
    view: View,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("page", &self.navigator.state().current_page)
            .field("view", &self.view.name())
            .finish()
    }
}

impl Session {
    /// Start from the initial location hash. Call [`Session::reload`] to
    /// get the first load.
    pub fn new(initial_hash: &str) -> Self {
        let navigator = Navigator::new(initial_hash);
        let page = navigator.state().current_page.clone();
        Self {
            navigator,
            fetch: LatestFetch::new(),
            view: View::Loading { page },
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn dispatch(&mut self, input: Input) -> Dispatched {
        let transition = match input {
            Input::Event(event) => self.navigator.handle(event),
            Input::Navigate(route) => self.navigator.navigate(route),
            Input::Back => self.navigator.go_back(),
            Input::BackFromUnit => self.navigator.go_back_from_unit_details(),
            Input::Retry => {
                return Dispatched {
                    transition: Transition::none(),
                    load: self.reload(),
                }
            }
        };

        let load = if transition.changed {
            self.reload()
        } else {
            None
        };
        Dispatched { transition, load }
    }

    /// Rebuild the view for the current page
    pub fn reload(&mut self) -> Option<PendingLoad> {
        let state = self.navigator.state();
        let page = state.current_page.clone();

        let back = match page {
            Page::UnitDetails => back::from_unit_details(state),
            _ => back::generic(state),
        };

        let Some(route) = self.navigator.current_route() else {
            self.fetch.clear();
            self.view = View::NotFound {
                message: format!("nothing selected for {}", page),
                back,
            };
            return None;
        };

        // Never offer "back" to the page that failed
        let back = if back.page() == page { Route::Home } else { back };

        match LoadRequest::for_route(&route) {
            Some(request) => {
                let ticket = self.fetch.begin(request.target());
                debug!(target_id = ticket.target(), seq = ticket.seq(), "Load started");
                self.view = View::Loading { page };
                Some(PendingLoad {
                    ticket,
                    request,
                    retry: route,
                    back,
                })
            }
            None => {
                self.fetch.clear();
                self.view = if page.is_renderable() {
                    View::Static { page }
                } else {
                    View::Blank { page }
                };
                None
            }
        }
    }

    /// Apply a finished load. Returns false when it was stale.
    pub fn complete(&mut self, loaded: Loaded) -> bool {
        if !self.fetch.accept(&loaded.ticket) {
            return false;
        }
        self.view = loaded.view;
        true
    }

    /// Dispatch and, when the transition needs data, load it immediately
    pub async fn run(&mut self, input: Input, source: &dyn CatalogSource) -> Transition {
        let Dispatched { transition, load } = self.dispatch(input);
        if let Some(load) = load {
            let loaded = load.load(source).await;
            self.complete(loaded);
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Building, Unit};
    use crate::catalog::seed::StaticCatalog;
    use async_trait::async_trait;

    fn hash(h: &str) -> Input {
        Input::Event(NavEvent::HashChange(h.to_string()))
    }

    #[tokio::test]
    async fn test_building_page_loads_its_units() {
        let mut session = Session::new("");
        session.run(hash("#orchard-plaza"), &StaticCatalog).await;
        match session.view() {
            View::Building { building, units } => {
                assert_eq!(building.id, "orchard-plaza");
                assert!(!units.is_empty());
                assert!(units
                    .iter()
                    .all(|u| u.resolved_building_id().as_deref() == Some("orchard-plaza")));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_unit_is_not_found_with_way_back() {
        let mut session = Session::new("#properties");
        session.run(hash("#unit-NOPE-1"), &StaticCatalog).await;
        match session.view() {
            View::NotFound { back, .. } => assert_eq!(back, &Route::Properties),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let mut session = Session::new("");
        let first = session.dispatch(hash("#ctp-alpha-tower")).load.unwrap();
        let second = session.dispatch(hash("#orchard-plaza")).load.unwrap();

        // Second navigation resolves first
        let loaded_second = second.load(&StaticCatalog).await;
        assert!(session.complete(loaded_second));
        let loaded_first = first.load(&StaticCatalog).await;
        assert!(!session.complete(loaded_first));

        match session.view() {
            View::Building { building, .. } => assert_eq!(building.id, "orchard-plaza"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_spaces_only_available() {
        let mut session = Session::new("");
        session
            .run(hash("#all-available-spaces?building=crc-corporate-center"), &StaticCatalog)
            .await;
        match session.view() {
            View::AllSpaces { results, .. } => {
                assert!(results.total > 0);
                assert!(results.units.iter().all(Unit::is_available));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_building_in_search_is_not_found() {
        let mut session = Session::new("#properties");
        session.run(hash("#search-no-such-building-3"), &StaticCatalog).await;
        assert!(matches!(session.view(), View::NotFound { .. }));

        let mut session = Session::new("");
        session
            .run(hash("#all-available-spaces?building=no-such-building"), &StaticCatalog)
            .await;
        assert!(matches!(session.view(), View::NotFound { .. }));

        session
            .run(hash("#all-available-spaces?building=all"), &StaticCatalog)
            .await;
        assert!(matches!(session.view(), View::AllSpaces { .. }));
    }

    #[tokio::test]
    async fn test_static_and_blank_pages_need_no_load() {
        let mut session = Session::new("");
        assert!(session.dispatch(hash("#about-team")).load.is_none());
        assert_eq!(session.view().name(), "static");

        assert!(session.dispatch(hash("#sustainability-solar")).load.is_none());
        assert_eq!(session.view().name(), "blank");
    }

    #[tokio::test]
    async fn test_echo_does_not_reload() {
        let mut session = Session::new("");
        let dispatched = session.dispatch(Input::Navigate(Route::Properties));
        assert!(dispatched.load.is_some());
        let echo = session.dispatch(hash("#properties"));
        assert!(echo.load.is_none());
    }

    struct FailingCatalog;

    fn down<T>() -> Result<T> {
        Err(Error::Remote {
            status: 503,
            message: "down".to_string(),
        })
    }

    #[async_trait]
    impl CatalogSource for FailingCatalog {
        fn name(&self) -> &str {
            "failing"
        }
        async fn list_buildings(&self) -> Result<Vec<Building>> {
            down()
        }
        async fn get_building(&self, _id: &str) -> Result<Building> {
            down()
        }
        async fn list_units(&self, _query: Option<&UnitQuery>) -> Result<Vec<Unit>> {
            down()
        }
        async fn get_unit(&self, _id: &str) -> Result<Unit> {
            down()
        }
        async fn create_unit(&self, _unit: Unit) -> Result<Unit> {
            down()
        }
        async fn update_unit(&self, _id: &str, _unit: Unit) -> Result<Unit> {
            down()
        }
        async fn delete_unit(&self, _id: &str) -> Result<()> {
            down()
        }
        async fn create_building(&self, _building: Building) -> Result<Building> {
            down()
        }
        async fn update_building(&self, _id: &str, _building: Building) -> Result<Building> {
            down()
        }
        async fn delete_building(&self, _id: &str) -> Result<()> {
            down()
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_offers_retry() {
        let mut session = Session::new("");
        session.run(hash("#properties"), &FailingCatalog).await;
        match session.view() {
            View::Error { retry, .. } => assert_eq!(retry, &Route::Properties),
            other => panic!("unexpected view {:?}", other),
        }
        // Navigation state is untouched by the failure
        assert_eq!(session.navigator().state().current_page, Page::Properties);

        session.run(Input::Retry, &StaticCatalog).await;
        assert_eq!(session.view().name(), "properties");
    }

    #[test]
    fn test_input_parsing() {
        assert_eq!("back".parse::<Input>().unwrap(), Input::Back);
        assert_eq!(
            "pop:#about".parse::<Input>().unwrap(),
            Input::Event(NavEvent::PopState("#about".to_string()))
        );
        assert!("about".parse::<Input>().is_err());
    }
}
