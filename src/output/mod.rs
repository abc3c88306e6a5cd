//! Output formatting for the CLI

pub mod human;
pub mod json;

use crate::app::View;
use crate::catalog::{Building, Unit};
use crate::nav::{NavigationState, Transition};
use crate::search::SearchResponse;
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// One replayed navigation input and where it left the session
#[derive(Debug, Clone, Serialize)]
pub struct NavStep {
    pub input: String,
    pub transition: Transition,
    pub location: String,
    pub state: NavigationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
}

/// Format a page of search results
pub fn format_results(results: &SearchResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_results(results),
        OutputFormat::Json => json::format(results),
    }
}

pub fn format_buildings(buildings: &[Building], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_buildings(buildings),
        OutputFormat::Json => json::format(&buildings),
    }
}

pub fn format_unit(unit: &Unit, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_unit(unit),
        OutputFormat::Json => json::format(unit),
    }
}

pub fn format_nav(steps: &[NavStep], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format_nav(steps),
        OutputFormat::Json => json::format(&steps),
    }
}
