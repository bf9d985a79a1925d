//! Field-priority lookups over raw backend records
//!
//! Each entity kind declares a table of candidate paths (`"funnel_id"`,
//! `"funnelId"`, `"funnel.id"`, ...). The helpers below walk a table in
//! order and return the first value that resolves.

use super::record_id::resolve_id;
use serde_json::Value;

/// Candidate paths for one logical field, highest priority first
pub type FieldTable = &'static [&'static str];

/// Dotted path lookup: `"product.name"` reads `record["product"]["name"]`
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |current, key| current.as_object()?.get(key))
}

/// First non-empty text value; numbers are rendered as text
pub fn first_text(record: &Value, table: FieldTable) -> Option<String> {
    table
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(text_of)
}

/// First numeric value; numeric strings (`"12.5"`, `"1 200,50"`) are accepted
pub fn first_number(record: &Value, table: FieldTable) -> Option<f64> {
    table
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(number_of)
}

/// First value that resolves to an id, scalar or embedded object
pub fn first_ref(record: &Value, table: FieldTable) -> Option<String> {
    table
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(resolve_id)
}

/// First embedded object under any of the paths
pub fn first_object<'a>(record: &'a Value, table: FieldTable) -> Option<&'a Value> {
    table
        .iter()
        .filter_map(|path| lookup(record, path))
        .find(|v| v.is_object())
}

/// First non-empty array under any of the paths
pub fn first_array<'a>(record: &'a Value, table: FieldTable) -> Option<&'a Vec<Value>> {
    table
        .iter()
        .filter_map(|path| lookup(record, path))
        .filter_map(Value::as_array)
        .find(|items| !items.is_empty())
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Decimal text as typed or exported: `"1 200,5"`, `"1,200.5"` and
/// `"1200.5"` all parse. A comma is a grouping separator when a dot is
/// present, the decimal separator otherwise.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let has_dot = text.contains('.');
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !(has_dot && *c == ','))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let record = json!({"product": {"name": "Drill"}});
        assert_eq!(lookup(&record, "product.name"), Some(&json!("Drill")));
        assert_eq!(lookup(&record, "product.price"), None);
        assert_eq!(lookup(&record, "missing.name"), None);
    }

    #[test]
    fn test_first_text_priority() {
        const NAME: FieldTable = &["title", "name"];
        let record = json!({"title": "  ", "name": "Second"});
        assert_eq!(first_text(&record, NAME), Some("Second".to_string()));
        assert_eq!(first_text(&json!({"title": 15}), NAME), Some("15".to_string()));
    }

    #[test]
    fn test_first_number_parses_strings() {
        const PRICE: FieldTable = &["price"];
        assert_eq!(first_number(&json!({"price": "1 200,50"}), PRICE), Some(1200.5));
        assert_eq!(first_number(&json!({"price": 3}), PRICE), Some(3.0));
        assert_eq!(first_number(&json!({"price": "abc"}), PRICE), None);
    }

    #[test]
    fn test_parse_decimal_separators() {
        assert_eq!(parse_decimal("1,200.50"), Some(1200.5));
        assert_eq!(parse_decimal("12,345,678.9"), Some(12345678.9));
        assert_eq!(parse_decimal("1 200,50"), Some(1200.5));
        assert_eq!(parse_decimal("0,75"), Some(0.75));
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("  "), None);
    }

    #[test]
    fn test_first_ref_handles_embedded_objects() {
        const FUNNEL: FieldTable = &["funnel_id", "funnelId", "funnel"];
        assert_eq!(
            first_ref(&json!({"funnel": {"_id": "F1"}}), FUNNEL),
            Some("F1".to_string())
        );
        assert_eq!(
            first_ref(&json!({"funnel_id": null, "funnelId": "F2"}), FUNNEL),
            Some("F2".to_string())
        );
    }
}
