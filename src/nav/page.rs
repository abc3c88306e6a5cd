//! Page identity

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Sustainability sections with their own view
pub const SUSTAINABILITY_SECTIONS: [&str; 5] =
    ["overview", "energy", "water", "wellness", "certifications"];

/// Which top-level view renders.
///
/// `Building` is the open-ended variant: any page id that is not one of the
/// fixed pages names a building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Page {
    #[default]
    Home,
    About,
    Services,
    Contact,
    ScheduleAppointment,
    AllAvailableSpaces,
    Properties,
    TenantPortal,
    UnitDetails,
    SearchResults,
    /// Carries the suffix after `sustainability-`
    Sustainability(String),
    ModernManagementTeam,
    Building(String),
}

const FIXED: [(&str, Page); 11] = [
    ("home", Page::Home),
    ("about", Page::About),
    ("services", Page::Services),
    ("contact", Page::Contact),
    ("schedule-appointment", Page::ScheduleAppointment),
    ("all-available-spaces", Page::AllAvailableSpaces),
    ("properties", Page::Properties),
    ("tenant-portal", Page::TenantPortal),
    ("unit-details", Page::UnitDetails),
    ("search-results", Page::SearchResults),
    ("modern-management-team", Page::ModernManagementTeam),
];

impl Page {
    /// Page id as used in history and logs
    pub fn id(&self) -> Cow<'_, str> {
        match self {
            Page::Sustainability(name) => Cow::Owned(format!("sustainability-{}", name)),
            Page::Building(id) => Cow::Borrowed(id),
            fixed => Cow::Borrowed(
                FIXED
                    .iter()
                    .find(|(_, page)| page == fixed)
                    .map(|(id, _)| *id)
                    .unwrap_or("home"),
            ),
        }
    }

    /// Inverse of [`Page::id`]
    pub fn from_id(id: &str) -> Page {
        if let Some(name) = id.strip_prefix("sustainability-") {
            return Page::Sustainability(name.to_string());
        }
        FIXED
            .iter()
            .find(|(fixed, _)| *fixed == id)
            .map(|(_, page)| page.clone())
            .unwrap_or_else(|| Page::Building(id.to_string()))
    }

    /// False for sustainability suffixes without a view
    pub fn is_renderable(&self) -> bool {
        match self {
            Page::Sustainability(name) => SUSTAINABILITY_SECTIONS.contains(&name.as_str()),
            _ => true,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl From<Page> for String {
    fn from(page: Page) -> Self {
        page.id().into_owned()
    }
}

impl From<String> for Page {
    fn from(id: String) -> Self {
        Page::from_id(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for page in [
            Page::Home,
            Page::TenantPortal,
            Page::UnitDetails,
            Page::ModernManagementTeam,
            Page::Sustainability("energy".to_string()),
            Page::Building("north-tower".to_string()),
        ] {
            assert_eq!(Page::from_id(&page.id()), page);
        }
    }

    #[test]
    fn test_unknown_id_is_building() {
        assert_eq!(
            Page::from_id("some-new-building-id"),
            Page::Building("some-new-building-id".to_string())
        );
    }

    #[test]
    fn test_unknown_sustainability_not_renderable() {
        assert!(Page::Sustainability("water".to_string()).is_renderable());
        assert!(!Page::Sustainability("solar".to_string()).is_renderable());
    }

    #[test]
    fn test_serializes_as_id() {
        let json = serde_json::to_string(&Page::Sustainability("energy".to_string())).unwrap();
        assert_eq!(json, "\"sustainability-energy\"");
        let page: Page = serde_json::from_str("\"orchard-plaza\"").unwrap();
        assert_eq!(page, Page::Building("orchard-plaza".to_string()));
    }
}
