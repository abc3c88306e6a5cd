//! Navigation store
//!
//! The [`Navigator`] owns the single [`NavigationState`] of a session. Hash
//! events are decode-only; programmatic navigation applies the route and
//! hands back the hash the adapter should write. Writing that hash fires a
//! hash event which the navigator recognizes as an echo and ignores.

use crate::nav::back;
use crate::nav::page::Page;
use crate::nav::route::{self, AllSpacesFilters, Route, SearchParams, SCROLL_DELAY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub current_page: Page,
    pub previous_page: Page,
    pub selected_unit_id: Option<String>,
    pub search_params: Option<SearchParams>,
    pub all_spaces_filters: Option<AllSpacesFilters>,
}

/// Something the view layer must do after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Scroll the element with this id into view once `delay` has passed
    ScrollIntoView {
        element_id: String,
        #[serde(with = "millis")]
        delay: Duration,
    },
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }
}

/// Outcome of feeding one event or action to the navigator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Page or payload changed
    pub changed: bool,
    /// Hash the adapter must write to the location, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_hash: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }
}

/// External navigation triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "hash", rename_all = "snake_case")]
pub enum NavEvent {
    HashChange(String),
    /// Browser back/forward
    PopState(String),
}

impl NavEvent {
    pub fn hash(&self) -> &str {
        match self {
            NavEvent::HashChange(hash) | NavEvent::PopState(hash) => hash,
        }
    }
}

fn strip_hash(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

/// Store/reducer over [`NavigationState`]
#[derive(Debug, Clone)]
pub struct Navigator {
    state: NavigationState,
    /// Hash currently in the location bar, without `#`
    location: String,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator {
    /// Start a session from the initial location hash
    pub fn new(initial_hash: &str) -> Self {
        let mut navigator = Self {
            state: NavigationState::default(),
            location: String::new(),
        };
        navigator.handle(NavEvent::HashChange(initial_hash.to_string()));
        // Landing is not a transition
        navigator.state.previous_page = Page::Home;
        navigator
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Hash the navigator believes is in the location bar
    pub fn location(&self) -> String {
        if self.location.is_empty() {
            String::new()
        } else {
            format!("#{}", self.location)
        }
    }

    /// Route for the current page, `None` when its payload is missing
    pub fn current_route(&self) -> Option<Route> {
        back::current_route(&self.state)
    }

    /// Process a hash or history event
    pub fn handle(&mut self, event: NavEvent) -> Transition {
        let hash = strip_hash(event.hash());
        if hash == self.location {
            return Transition::none();
        }
        self.location = hash.to_string();

        match route::decode(hash) {
            Some(route) => {
                let changed = self.apply(&route);
                Transition {
                    changed,
                    write_hash: None,
                    effects: effects_for(&route),
                }
            }
            None => {
                debug!(hash, "Ignoring malformed hash");
                Transition::none()
            }
        }
    }

    /// Programmatic navigation
    pub fn navigate(&mut self, route: Route) -> Transition {
        let route = match route {
            Route::AllAvailableSpaces(filters) => {
                Route::AllAvailableSpaces(AllSpacesFilters::normalize(filters))
            }
            other => other,
        };

        let changed = self.apply(&route);
        let hash = route::encode(&route);
        let write_hash = if strip_hash(&hash) != self.location {
            self.location = strip_hash(&hash).to_string();
            Some(hash)
        } else {
            None
        };

        Transition {
            changed,
            write_hash,
            effects: effects_for(&route),
        }
    }

    pub fn go_back(&mut self) -> Transition {
        let route = back::generic(&self.state);
        self.navigate(route)
    }

    pub fn go_back_from_unit_details(&mut self) -> Transition {
        let route = back::from_unit_details(&self.state);
        self.navigate(route)
    }

    /// Apply a decoded route. Same-page routes only update the payload so
    /// history is never overwritten with the current page.
    fn apply(&mut self, route: &Route) -> bool {
        let page = route.page();
        let mut changed = false;

        if page != self.state.current_page {
            debug!(from = %self.state.current_page, to = %page, "Navigate");
            self.state.previous_page = std::mem::replace(&mut self.state.current_page, page);
            changed = true;
        }

        match route {
            Route::UnitDetails(id) => {
                changed |= replace(&mut self.state.selected_unit_id, Some(id.clone()));
            }
            Route::SearchResults(params) => {
                changed |= replace(&mut self.state.search_params, Some(params.clone()));
            }
            Route::AllAvailableSpaces(filters) => {
                changed |= replace(&mut self.state.all_spaces_filters, filters.clone());
            }
            _ => {}
        }

        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn effects_for(route: &Route) -> Vec<Effect> {
    route
        .section()
        .map(|section| Effect::ScrollIntoView {
            element_id: section.to_string(),
            delay: SCROLL_DELAY,
        })
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(h: &str) -> NavEvent {
        NavEvent::HashChange(h.to_string())
    }

    #[test]
    fn test_initial_state_from_hash() {
        let nav = Navigator::new("#unit-OPL-201");
        assert_eq!(nav.state().current_page, Page::UnitDetails);
        assert_eq!(nav.state().previous_page, Page::Home);
        assert_eq!(nav.state().selected_unit_id.as_deref(), Some("OPL-201"));

        assert_eq!(Navigator::new("").state().current_page, Page::Home);
    }

    #[test]
    fn test_history_invariant() {
        let mut nav = Navigator::new("#about");
        let t = nav.handle(hash("#properties"));
        assert!(t.changed);
        assert_eq!(nav.state().previous_page, Page::About);
        assert_eq!(nav.state().current_page, Page::Properties);
    }

    #[test]
    fn test_repeat_decode_is_noop() {
        let mut nav = Navigator::new("#about");
        nav.handle(hash("#services"));
        let before = nav.state().clone();

        let t = nav.handle(NavEvent::PopState("#services".to_string()));
        assert_eq!(t, Transition::none());
        assert_eq!(nav.state(), &before);
        assert_ne!(nav.state().previous_page, nav.state().current_page);
    }

    #[test]
    fn test_same_page_keeps_history() {
        let mut nav = Navigator::new("#properties");
        nav.handle(hash("#unit-CTP-301"));
        let t = nav.handle(hash("#unit-CTP-302"));
        assert!(t.changed);
        assert_eq!(nav.state().previous_page, Page::Properties);
        assert_eq!(nav.state().selected_unit_id.as_deref(), Some("CTP-302"));
    }

    #[test]
    fn test_navigate_writes_hash_and_echo_is_ignored() {
        let mut nav = Navigator::new("");
        let t = nav.navigate(Route::Building("orchard-plaza".to_string()));
        assert_eq!(t.write_hash.as_deref(), Some("#orchard-plaza"));
        assert!(t.changed);

        let echo = nav.handle(hash("#orchard-plaza"));
        assert!(!echo.changed);
        assert_eq!(nav.state().previous_page, Page::Home);
        assert_eq!(nav.location(), "#orchard-plaza");
    }

    #[test]
    fn test_malformed_search_hash_is_noop() {
        let mut nav = Navigator::new("#properties");
        let before = nav.state().clone();
        let t = nav.handle(hash("#search-ctp-alpha-tower-notanumber"));
        assert!(!t.changed);
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_dynamic_building_page() {
        let mut nav = Navigator::new("");
        nav.handle(hash("#some-new-building-id"));
        assert_eq!(
            nav.state().current_page,
            Page::Building("some-new-building-id".to_string())
        );
        assert_eq!(nav.state().current_page.id(), "some-new-building-id");
    }

    #[test]
    fn test_section_hash_schedules_scroll() {
        let mut nav = Navigator::new("");
        let t = nav.handle(hash("#services-leasing"));
        assert_eq!(nav.state().current_page, Page::Services);
        assert_eq!(
            t.effects,
            vec![Effect::ScrollIntoView {
                element_id: "leasing".to_string(),
                delay: Duration::from_millis(100),
            }]
        );
    }

    #[test]
    fn test_all_spaces_filters_cleared_without_query() {
        let mut nav = Navigator::new("#all-available-spaces?building=orchard-plaza");
        assert!(nav.state().all_spaces_filters.is_some());
        nav.handle(hash("#all-available-spaces"));
        assert!(nav.state().all_spaces_filters.is_none());
    }

    #[test]
    fn test_sticky_payload_survives_other_pages() {
        let mut nav = Navigator::new("#search-crc-corporate-center-5");
        nav.handle(hash("#unit-CRC-501"));
        nav.handle(hash("#contact"));
        assert_eq!(
            nav.state().search_params,
            Some(SearchParams {
                building_id: "crc-corporate-center".to_string(),
                floor: 5,
            })
        );
    }

    #[test]
    fn test_back_from_unit_after_search() {
        let mut nav = Navigator::new("#search-crc-corporate-center-5");
        nav.handle(hash("#unit-CRC-501"));
        let t = nav.go_back_from_unit_details();
        assert_eq!(t.write_hash.as_deref(), Some("#search-crc-corporate-center-5"));
        assert_eq!(nav.state().current_page, Page::SearchResults);
        assert_eq!(nav.state().previous_page, Page::UnitDetails);
    }

    #[test]
    fn test_back_from_unit_uses_prefix() {
        let mut nav = Navigator::new("#properties");
        nav.handle(hash("#unit-CRC-501"));
        nav.go_back_from_unit_details();
        assert_eq!(
            nav.state().current_page,
            Page::Building("crc-corporate-center".to_string())
        );
    }

    #[test]
    fn test_generic_back() {
        let mut nav = Navigator::new("#tenant-portal");
        nav.handle(hash("#contact"));
        nav.go_back();
        assert_eq!(nav.state().current_page, Page::TenantPortal);
        assert_eq!(nav.state().previous_page, Page::Contact);
    }

    #[test]
    fn test_rapid_events_end_on_last() {
        let mut nav = Navigator::new("");
        for h in ["#about", "#unit-OPL-201", "#search-orchard-plaza-2", "#properties"] {
            nav.handle(hash(h));
        }
        assert_eq!(nav.state().current_page, Page::Properties);
        assert_eq!(nav.state().previous_page, Page::SearchResults);
    }
}
