//! Hash grammar
//!
//! `decode` and `encode` are pure. Anything that touches a real browser
//! location lives in the caller.

use crate::nav::page::Page;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Delay before scrolling to a section so the new view can mount first
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);

const ALL_SPACES: &str = "all-available-spaces";

/// Payload of the search-results page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub building_id: String,
    pub floor: i32,
}

/// Payload of the all-available-spaces page
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllSpacesFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl AllSpacesFilters {
    pub fn is_empty(&self) -> bool {
        self.building.is_none() && self.condition.is_none()
    }

    /// Filters with no keys are the same as no filters
    pub fn normalize(filters: Option<Self>) -> Option<Self> {
        filters.filter(|f| !f.is_empty())
    }

    fn from_query(query: &str) -> Option<Self> {
        let mut filters = AllSpacesFilters::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "building" => filters.building = Some(value.into_owned()),
                "condition" => filters.condition = Some(value.into_owned()),
                _ => {}
            }
        }
        Self::normalize(Some(filters))
    }

    fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(ref building) = self.building {
            query.append_pair("building", building);
        }
        if let Some(ref condition) = self.condition {
            query.append_pair("condition", condition);
        }
        query.finish()
    }
}

/// A navigation target: a page plus whatever payload it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", content = "params", rename_all = "kebab-case")]
pub enum Route {
    Home,
    About { section: Option<String> },
    Services { section: Option<String> },
    Contact { section: Option<String> },
    ScheduleAppointment,
    Properties,
    TenantPortal,
    ModernManagementTeam,
    Sustainability(String),
    UnitDetails(String),
    SearchResults(SearchParams),
    AllAvailableSpaces(Option<AllSpacesFilters>),
    Building(String),
}

impl Route {
    /// Page this route selects
    pub fn page(&self) -> Page {
        match self {
            Route::Home => Page::Home,
            Route::About { .. } => Page::About,
            Route::Services { .. } => Page::Services,
            Route::Contact { .. } => Page::Contact,
            Route::ScheduleAppointment => Page::ScheduleAppointment,
            Route::Properties => Page::Properties,
            Route::TenantPortal => Page::TenantPortal,
            Route::ModernManagementTeam => Page::ModernManagementTeam,
            Route::Sustainability(name) => Page::Sustainability(name.clone()),
            Route::UnitDetails(_) => Page::UnitDetails,
            Route::SearchResults(_) => Page::SearchResults,
            Route::AllAvailableSpaces(_) => Page::AllAvailableSpaces,
            Route::Building(id) => Page::Building(id.clone()),
        }
    }

    /// In-page section to scroll to after the view mounts
    pub fn section(&self) -> Option<&str> {
        match self {
            Route::About { section } | Route::Services { section } | Route::Contact { section } => {
                section.as_deref()
            }
            _ => None,
        }
    }
}

fn section_route(parent: &str, rest: &str) -> Option<Route> {
    let section = Some(rest.to_string()).filter(|s| !s.is_empty());
    match parent {
        "about" => Some(Route::About { section }),
        "services" => Some(Route::Services { section }),
        "contact" => Some(Route::Contact { section }),
        _ => None,
    }
}

fn decode_search(rest: &str) -> Option<Route> {
    // Building ids may contain hyphens; the floor is always the last token
    let (building_id, floor) = rest.rsplit_once('-')?;
    if building_id.is_empty() {
        return None;
    }
    let floor = floor.parse::<i32>().ok()?;
    Some(Route::SearchResults(SearchParams {
        building_id: building_id.to_string(),
        floor,
    }))
}

/// Decode a location hash (with or without the leading `#`).
///
/// `None` means the hash is malformed and must be ignored.
pub fn decode(hash: &str) -> Option<Route> {
    let hash = hash.strip_prefix('#').unwrap_or(hash);

    match hash {
        "" | "home" => return Some(Route::Home),
        "about" => return Some(Route::About { section: None }),
        "services" => return Some(Route::Services { section: None }),
        "contact" => return Some(Route::Contact { section: None }),
        "properties" => return Some(Route::Properties),
        "tenant-portal" => return Some(Route::TenantPortal),
        "schedule-appointment" => return Some(Route::ScheduleAppointment),
        "modern-management-team" => return Some(Route::ModernManagementTeam),
        ALL_SPACES => return Some(Route::AllAvailableSpaces(None)),
        _ => {}
    }

    if let Some(query) = hash
        .strip_prefix(ALL_SPACES)
        .and_then(|rest| rest.strip_prefix('?'))
    {
        return Some(Route::AllAvailableSpaces(AllSpacesFilters::from_query(query)));
    }

    if let Some((head, rest)) = hash.split_once('-') {
        match head {
            "about" | "services" | "contact" => return section_route(head, rest),
            "sustainability" => return Some(Route::Sustainability(rest.to_string())),
            "tenant" => return Some(Route::TenantPortal),
            "unit" if rest.is_empty() => return None,
            "unit" => return Some(Route::UnitDetails(rest.to_string())),
            "search" => return decode_search(rest),
            _ => {}
        }
    }

    Some(Route::Building(hash.to_string()))
}

/// Canonical hash for a route. Home encodes as the empty hash.
pub fn encode(route: &Route) -> String {
    let with_section = |parent: &str, section: &Option<String>| match section {
        Some(section) => format!("#{}-{}", parent, section),
        None => format!("#{}", parent),
    };

    match route {
        Route::Home => String::new(),
        Route::About { section } => with_section("about", section),
        Route::Services { section } => with_section("services", section),
        Route::Contact { section } => with_section("contact", section),
        Route::ScheduleAppointment => "#schedule-appointment".to_string(),
        Route::Properties => "#properties".to_string(),
        Route::TenantPortal => "#tenant-portal".to_string(),
        Route::ModernManagementTeam => "#modern-management-team".to_string(),
        Route::Sustainability(name) => format!("#sustainability-{}", name),
        Route::UnitDetails(id) => format!("#unit-{}", id),
        Route::SearchResults(params) => {
            if params.floor < 0 {
                // The minus sign reads back as part of the building id
                debug!(
                    building = %params.building_id,
                    floor = params.floor,
                    "Search hash for a negative floor will not decode to the same route"
                );
            }
            format!("#search-{}-{}", params.building_id, params.floor)
        }
        Route::AllAvailableSpaces(filters) => match filters.as_ref().filter(|f| !f.is_empty()) {
            Some(filters) => format!("#{}?{}", ALL_SPACES, filters.to_query()),
            None => format!("#{}", ALL_SPACES),
        },
        Route::Building(id) => format!("#{}", id),
    }
}
