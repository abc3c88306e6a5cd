//! JSON output formatting

use serde::Serialize;

/// Pretty-print any serializable value
pub fn format<T: Serialize + ?Sized>(value: &T) -> String {
    let mut output = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize output: {}"}}"#, e));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Unit, UnitStatus};

    #[test]
    fn test_format_ends_with_newline() {
        let unit = Unit::new("CRC-1", "Suite 1", UnitStatus::Available);
        let output = format(&unit);
        assert!(output.ends_with("}\n"));
        assert!(output.contains(r#""status": "Available""#));
    }
}
