//! Human-readable output formatting

use crate::app::View;
use crate::catalog::{Building, Unit};
use crate::output::NavStep;
use crate::search::SearchResponse;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn unit_line(unit: &Unit) -> String {
    format!(
        "{:<12} {:<32} floor {:>3}  {:>7} m2  {:>10}  {}",
        unit.id,
        truncate(&unit.title, 32),
        or_dash(unit.floor),
        or_dash(unit.size.map(|s| format!("{:.0}", s))),
        or_dash(unit.price.map(|p| format!("{:.0}", p))),
        unit.status
    )
}

/// Format a page of search results
pub fn format_results(results: &SearchResponse) -> String {
    let mut output = String::new();
    let query = if results.query.is_empty() {
        "all units"
    } else {
        results.query.as_str()
    };

    if results.is_empty() {
        output.push_str(&format!(
            "No units match '{}' [{}] ({:.1}ms)\n",
            query, results.scope, results.elapsed_ms
        ));
        return output;
    }

    output.push_str(&format!(
        "Showing {}-{} of {} units for '{}' [{}] ({:.1}ms)\n\n",
        results.offset + 1,
        results.offset + results.units.len(),
        results.total,
        query,
        results.scope,
        results.elapsed_ms
    ));

    for unit in &results.units {
        output.push_str(&unit_line(unit));
        output.push('\n');
    }

    if results.has_more() {
        output.push_str(&format!(
            "\n... {} more (use --offset {})\n",
            results.total - results.offset - results.units.len(),
            results.offset + results.units.len()
        ));
    }

    output
}

pub fn format_buildings(buildings: &[Building]) -> String {
    if buildings.is_empty() {
        return "No buildings in catalog\n".to_string();
    }

    let mut output = format!("{} buildings\n\n", buildings.len());
    for building in buildings {
        let (units, available) = building.unit_counts();
        output.push_str(&format!(
            "{:<20} {:<32} {:>4} units, {:>3} available",
            building.id,
            truncate(&building.name, 32),
            units,
            available
        ));
        if !building.location.is_empty() {
            output.push_str(&format!("  ({})", building.location));
        }
        output.push('\n');
    }
    output
}

/// Detail card for a single unit
pub fn format_unit(unit: &Unit) -> String {
    let mut output = format!("{} - {}\n", unit.id, unit.title);
    output.push_str(&format!("  Status:    {}\n", unit.status));
    if let Some(condition) = unit.condition {
        output.push_str(&format!("  Condition: {}\n", condition));
    }
    if let Some(building) = unit.resolved_building_id() {
        match &unit.building_name {
            Some(name) => output.push_str(&format!("  Building:  {} ({})\n", name, building)),
            None => output.push_str(&format!("  Building:  {}\n", building)),
        }
    }
    output.push_str(&format!("  Floor:     {}\n", or_dash(unit.floor)));
    output.push_str(&format!(
        "  Size:      {}\n",
        or_dash(unit.size.map(|s| format!("{:.0} m2", s)))
    ));
    if let Some(capacity) = unit.capacity {
        output.push_str(&format!("  Capacity:  {} people\n", capacity));
    }
    output.push_str(&format!(
        "  Price:     {}\n",
        or_dash(unit.price.map(|p| format!("{:.0} / month", p)))
    ));
    if !unit.location.is_empty() {
        output.push_str(&format!("  Location:  {}\n", unit.location));
    }
    if !unit.description.is_empty() {
        output.push('\n');
        for line in unit.description.lines().take(5) {
            output.push_str(&format!("  {}\n", truncate(line, 80)));
        }
    }
    output
}

fn view_summary(view: &View) -> String {
    match view {
        View::Loading { page } => format!("loading {}", page),
        View::Static { page } => format!("static page {}", page),
        View::Blank { page } => format!("blank page {}", page),
        View::Properties { buildings } => format!("{} buildings", buildings.len()),
        View::Building { building, units } => {
            format!("{} with {} units", building.name, units.len())
        }
        View::Unit { unit } => format!("{} ({})", unit.title, unit.status),
        View::SearchResults { params, results } => format!(
            "{} units on floor {} of {}",
            results.total, params.floor, params.building_id
        ),
        View::AllSpaces { results, .. } => format!("{} available units", results.total),
        View::NotFound { message, back } => format!("not found: {} (back to {})", message, back.page()),
        View::Error { message, .. } => format!("error: {} (retry available)", message),
    }
}

/// One line per replayed navigation input
pub fn format_nav(steps: &[NavStep]) -> String {
    let mut output = String::new();
    for (i, step) in steps.iter().enumerate() {
        let marker = if step.transition.changed { "*" } else { " " };
        let location = if step.location.is_empty() {
            "(home)"
        } else {
            step.location.as_str()
        };
        output.push_str(&format!(
            "{}. {} {:<24} -> {:<32} previous: {}\n",
            i + 1,
            marker,
            truncate(&step.input, 24),
            location,
            step.state.previous_page
        ));
        if let Some(hash) = &step.transition.write_hash {
            output.push_str(&format!("     write {}\n", hash));
        }
        for effect in &step.transition.effects {
            if let Ok(text) = serde_json::to_string(effect) {
                output.push_str(&format!("     effect {}\n", text));
            }
        }
        if let Some(view) = &step.view {
            output.push_str(&format!("     view [{}] {}\n", view.name(), view_summary(view)));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitStatus;

    fn page(units: Vec<Unit>, total: usize) -> SearchResponse {
        SearchResponse {
            units,
            total,
            offset: 0,
            limit: 2,
            query: "building=crc".to_string(),
            scope: "all".to_string(),
            elapsed_ms: 0.4,
        }
    }

    #[test]
    fn test_empty_results() {
        let output = format_results(&page(vec![], 0));
        assert!(output.starts_with("No units match 'building=crc'"));
    }

    #[test]
    fn test_results_mention_remaining() {
        let units = vec![
            Unit::new("CRC-1", "Suite 1", UnitStatus::Available),
            Unit::new("CRC-2", "Suite 2", UnitStatus::Taken),
        ];
        let output = format_results(&page(units, 5));
        assert!(output.contains("Showing 1-2 of 5"));
        assert!(output.contains("3 more (use --offset 2)"));
        assert!(output.contains("CRC-2"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Bürogebäude Nord", 8), "Bürog...");
    }

    #[test]
    fn test_unit_card_shows_missing_fields_as_dash() {
        let unit = Unit::new("X-1", "Loose unit", UnitStatus::ComingSoon);
        let output = format_unit(&unit);
        assert!(output.contains("Status:    Coming Soon"));
        assert!(output.contains("Floor:     -"));
        assert!(!output.contains("Building:"));
    }
}
