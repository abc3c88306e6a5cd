//! Back navigation
//!
//! Two rules with different inputs: the generic one dispatches on the
//! previous page, the unit-details one looks at the unit id first.

use crate::catalog::legacy::{self, LegacyTarget};
use crate::nav::page::Page;
use crate::nav::route::Route;
use crate::nav::state::NavigationState;

/// Route that re-opens `page`, reusing sticky payload from `state`
fn route_for(page: &Page, state: &NavigationState) -> Route {
    match page {
        Page::Home => Route::Home,
        Page::About => Route::About { section: None },
        Page::Services => Route::Services { section: None },
        Page::Contact => Route::Contact { section: None },
        Page::ScheduleAppointment => Route::ScheduleAppointment,
        Page::Properties => Route::Properties,
        Page::TenantPortal => Route::TenantPortal,
        Page::ModernManagementTeam => Route::ModernManagementTeam,
        Page::AllAvailableSpaces => Route::AllAvailableSpaces(state.all_spaces_filters.clone()),
        Page::Sustainability(name) if page.is_renderable() => Route::Sustainability(name.clone()),
        Page::Sustainability(_) => Route::Home,
        Page::UnitDetails => match state.selected_unit_id {
            Some(ref id) => Route::UnitDetails(id.clone()),
            None => Route::Home,
        },
        Page::SearchResults => match state.search_params {
            Some(ref params) => Route::SearchResults(params.clone()),
            None => Route::Home,
        },
        Page::Building(id) => Route::Building(id.clone()),
    }
}

/// Route for the current page, when its payload is present
pub fn current_route(state: &NavigationState) -> Option<Route> {
    match state.current_page {
        Page::UnitDetails if state.selected_unit_id.is_none() => None,
        Page::SearchResults if state.search_params.is_none() => None,
        Page::Sustainability(ref name) => Some(Route::Sustainability(name.clone())),
        ref page => Some(route_for(page, state)),
    }
}

/// Generic back: dispatch on the previous page
pub fn generic(state: &NavigationState) -> Route {
    route_for(&state.previous_page, state)
}

/// Back from a unit's details.
///
/// A pending search wins, then the unit id prefix, then generic back.
pub fn from_unit_details(state: &NavigationState) -> Route {
    if state.previous_page == Page::SearchResults {
        if let Some(ref params) = state.search_params {
            return Route::SearchResults(params.clone());
        }
    }

    match state.selected_unit_id.as_deref().and_then(legacy::lookup) {
        Some(LegacyTarget::Building(building_id)) => Route::Building(building_id.to_string()),
        Some(LegacyTarget::Home) => Route::Home,
        None => generic(state),
    }
}
