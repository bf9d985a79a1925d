//! Response envelope unwrapping
//!
//! List endpoints answer either with a bare array or with an object that
//! wraps it under one of several conventional keys, sometimes nested
//! (`{"data": {"items": [...]}}`). Callers never look at the envelope
//! shape themselves.

use super::record_id::resolve_id;
use serde_json::Value;

/// Conventional wrapper keys, searched before the entity-specific ones
pub const LIST_KEYS: [&str; 8] = [
    "data", "items", "results", "rows", "list", "records", "docs", "content",
];

/// Wrapper keys for single-record responses
pub const RECORD_KEYS: [&str; 4] = ["data", "item", "result", "record"];

/// Nesting depth searched below the top-level value
pub const MAX_ENVELOPE_DEPTH: usize = 4;

/// Extract the first non-empty array from a response envelope.
///
/// `entity_keys` are tried after [`LIST_KEYS`] at every level (e.g.
/// `["clients"]`). Returns an empty vec when nothing is found.
pub fn extract_array(response: &Value, entity_keys: &[&str]) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        _ => find_array(response, entity_keys, 0)
            .cloned()
            .unwrap_or_default(),
    }
}

fn find_array<'a>(value: &'a Value, entity_keys: &[&str], depth: usize) -> Option<&'a Vec<Value>> {
    if depth > MAX_ENVELOPE_DEPTH {
        return None;
    }
    let map = value.as_object()?;
    let keys = LIST_KEYS.iter().chain(entity_keys.iter());

    for key in keys {
        match map.get(*key) {
            Some(Value::Array(items)) if !items.is_empty() => return Some(items),
            Some(nested @ Value::Object(_)) => {
                if let Some(found) = find_array(nested, entity_keys, depth + 1) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Unwrap a single-record response (`{"data": {...}}`, `{"contract": {...}}`).
///
/// The innermost wrapped object carrying a resolvable id wins; the response
/// itself is returned when no wrapper matches.
pub fn extract_record(response: &Value, entity_keys: &[&str]) -> Value {
    find_record(response, entity_keys, 0)
        .cloned()
        .unwrap_or_else(|| response.clone())
}

fn find_record<'a>(value: &'a Value, entity_keys: &[&str], depth: usize) -> Option<&'a Value> {
    if depth > MAX_ENVELOPE_DEPTH {
        return None;
    }
    let map = value.as_object()?;
    // Wrappers first: envelopes like `{"code": 200, "data": {...}}` resolve an id too
    RECORD_KEYS
        .iter()
        .chain(entity_keys.iter())
        .filter_map(|key| map.get(*key))
        .filter(|nested| nested.is_object())
        .find_map(|nested| find_record(nested, entity_keys, depth + 1))
        .or_else(|| resolve_id(value).map(|_| value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let items = extract_array(&json!([{"id": 1}, {"id": 2}]), &[]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_conventional_keys() {
        assert_eq!(extract_array(&json!({"items": [{"id": 1}]}), &[]).len(), 1);
        assert_eq!(extract_array(&json!({"rows": [1, 2, 3]}), &[]).len(), 3);
    }

    #[test]
    fn test_skips_empty_arrays() {
        let response = json!({"data": [], "clients": [{"id": "c1"}]});
        let items = extract_array(&response, &["clients"]);
        assert_eq!(items, vec![json!({"id": "c1"})]);
    }

    #[test]
    fn test_nested_envelope() {
        let response = json!({"data": {"meta": {"total": 2}, "funnels": [{"id": "f"}]}});
        assert_eq!(extract_array(&response, &["funnels"]).len(), 1);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut response = json!({"items": [1]});
        for _ in 0..(MAX_ENVELOPE_DEPTH + 2) {
            response = json!({ "data": response });
        }
        assert!(extract_array(&response, &[]).is_empty());
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert!(extract_array(&json!({"message": "ok"}), &[]).is_empty());
        assert!(extract_array(&json!("text"), &[]).is_empty());
        assert!(extract_array(&Value::Null, &[]).is_empty());
    }

    #[test]
    fn test_extract_record() {
        let wrapped = json!({"success": true, "data": {"contract": {"_id": "K1", "number": "7"}}});
        assert_eq!(extract_record(&wrapped, &["contract"])["_id"], json!("K1"));

        let bare = json!({"id": "K2"});
        assert_eq!(extract_record(&bare, &["contract"]), bare);

        let coded = json!({"code": 200, "data": {"id": "K3"}});
        assert_eq!(extract_record(&coded, &[])["id"], json!("K3"));
    }
}
