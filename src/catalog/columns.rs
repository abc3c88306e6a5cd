//! Decoding of JSON-in-text columns
//!
//! Building and unit rows keep their structured sub-objects (description
//! paragraphs, stats, hours, contact, images, floor plans, availability) as
//! serialized JSON text. Every reader goes through these helpers: absent or
//! malformed text decodes to an empty value and logs a warning, never an
//! error.

use crate::catalog::model::{BuildingContact, BuildingStat, FloorPlanSummary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Parse a column into `T`, falling back to `T::default()`
pub fn decode_or_default<T>(column: &str, text: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return T::default();
    };

    match serde_json::from_str::<T>(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(column, error = %e, "Malformed JSON column, using empty value");
            T::default()
        }
    }
}

/// Parse a column as a raw JSON value. Anything unparseable is `Value::Null`.
fn parse_value(column: &str, text: Option<&str>) -> Value {
    decode_or_default::<Option<Value>>(column, text).unwrap_or(Value::Null)
}

/// Description paragraphs: a JSON array of strings, or a single JSON string
pub fn decode_paragraphs(text: Option<&str>) -> Vec<String> {
    match parse_value("description", text) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    }
}

/// Building stats: `[{"label":..,"value":..}]` or the older `{"label": value}` map
pub fn decode_stats(text: Option<&str>) -> Vec<BuildingStat> {
    match parse_value("stats", text) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<BuildingStat>(item).ok())
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(label, value)| BuildingStat {
                label,
                value: scalar_to_string(value),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Opening hours map. Non-string values are stringified.
pub fn decode_hours(text: Option<&str>) -> BTreeMap<String, String> {
    match parse_value("hours", text) {
        Value::Object(map) => map
            .into_iter()
            .map(|(day, hours)| (day, scalar_to_string(hours)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

pub fn decode_contact(text: Option<&str>) -> BuildingContact {
    decode_or_default("contact", text)
}

/// Image list: a JSON array of URLs, or a single URL stored as a JSON string
pub fn decode_images(text: Option<&str>) -> Vec<String> {
    match parse_value("images", text) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    }
}

/// Floor plan summaries. Rows that do not parse are dropped individually.
pub fn decode_floor_plans(text: Option<&str>) -> Vec<FloorPlanSummary> {
    match parse_value("floor_plans", text) {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<FloorPlanSummary>(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Opaque blob (unit floor plan, availability): object or array, else `{}`
pub fn decode_blob(column: &str, text: Option<&str>) -> Value {
    match parse_value(column, text) {
        value @ (Value::Object(_) | Value::Array(_)) => value,
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// Serialize a value for storage in a text column
pub fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_accept_array_and_string() {
        assert_eq!(
            decode_paragraphs(Some(r#"["One", "", "Two"]"#)),
            vec!["One".to_string(), "Two".to_string()]
        );
        assert_eq!(decode_paragraphs(Some(r#""Only""#)), vec!["Only".to_string()]);
    }

    #[test]
    fn test_malformed_columns_default_to_empty() {
        assert!(decode_paragraphs(Some("not json {")).is_empty());
        assert!(decode_stats(Some("[1, 2")).is_empty());
        assert!(decode_hours(Some("42")).is_empty());
        assert_eq!(decode_contact(Some("{broken")), BuildingContact::default());
        assert!(decode_images(None).is_empty());
        assert!(decode_floor_plans(Some("")).is_empty());
        assert_eq!(decode_blob("availability", Some("true")), serde_json::json!({}));
    }

    #[test]
    fn test_stats_legacy_map_form() {
        let stats = decode_stats(Some(r#"{"Floors": 12, "Parking": "200 slots"}"#));
        assert_eq!(stats.len(), 2);
        assert!(stats
            .iter()
            .any(|s| s.label == "Floors" && s.value == "12"));
    }

    #[test]
    fn test_floor_plans_drop_bad_rows() {
        let plans = decode_floor_plans(Some(
            r#"[{"floor": 3, "units": 4, "available": 1}, {"units": "many"}]"#,
        ));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].floor, 3);
        assert_eq!(plans[0].total_area, 0.0);
    }

    #[test]
    fn test_hours_stringifies_scalars() {
        let hours = decode_hours(Some(r#"{"Sat": null, "Mon-Fri": "8:00-18:00"}"#));
        assert_eq!(hours.get("Sat").map(String::as_str), Some(""));
        assert_eq!(hours.get("Mon-Fri").map(String::as_str), Some("8:00-18:00"));
    }
}
