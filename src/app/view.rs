//! What a session shows for its current page

use crate::catalog::model::{Building, Unit};
use crate::nav::{AllSpacesFilters, Page, Route, SearchParams};
use crate::search::SearchResponse;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Data for `page` is on its way
    Loading { page: Page },
    /// Content page with nothing to fetch
    Static { page: Page },
    /// Page id accepted by the router but with no view of its own
    Blank { page: Page },
    Properties { buildings: Vec<Building> },
    Building { building: Building, units: Vec<Unit> },
    Unit { unit: Unit },
    SearchResults {
        params: SearchParams,
        results: SearchResponse,
    },
    AllSpaces {
        #[serde(skip_serializing_if = "Option::is_none")]
        filters: Option<AllSpacesFilters>,
        results: SearchResponse,
    },
    NotFound { message: String, back: Route },
    Error { message: String, retry: Route },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Loading { .. } => "loading",
            View::Static { .. } => "static",
            View::Blank { .. } => "blank",
            View::Properties { .. } => "properties",
            View::Building { .. } => "building",
            View::Unit { .. } => "unit",
            View::SearchResults { .. } => "search_results",
            View::AllSpaces { .. } => "all_spaces",
            View::NotFound { .. } => "not_found",
            View::Error { .. } => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, View::Loading { .. })
    }
}
