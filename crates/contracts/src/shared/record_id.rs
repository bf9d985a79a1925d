//! Identifier resolution for backend records
//!
//! The backend has used several id conventions over time (`id`, Mongo-style
//! `_id`, `uuid`, ...). Every equality check between records goes through
//! [`resolve_id`], so two records are the same entity iff their resolved ids
//! are string-equal.

use serde_json::Value;

/// Object keys tried in priority order; the first non-empty one wins
pub const ID_KEYS: [&str; 7] = ["id", "_id", "uuid", "guid", "ID", "Id", "code"];

/// Resolve a stable string id from a scalar or an object.
///
/// `0`, `""` and whitespace-only strings are absence, not ids.
pub fn resolve_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => ID_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(id_from_field),
        other => scalar_id(other),
    }
}

/// Id of a scalar value (string or number), `None` for everything else
pub fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

// `{"_id": {"$oid": "..."}}` is how some exports wrap object ids
fn id_from_field(value: &Value) -> Option<String> {
    match value {
        Value::Object(inner) => inner.get("$oid").and_then(scalar_id),
        other => scalar_id(other),
    }
}

/// Two records denote the same entity
pub fn same_entity(a: &Value, b: &Value) -> bool {
    match (resolve_id(a), resolve_id(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Compare a record against an already resolved id
pub fn has_id(record: &Value, id: &str) -> bool {
    resolve_id(record).as_deref() == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_values() {
        assert_eq!(resolve_id(&json!("abc")), Some("abc".to_string()));
        assert_eq!(resolve_id(&json!(42)), Some("42".to_string()));
        assert_eq!(resolve_id(&json!(0)), None);
        assert_eq!(resolve_id(&json!("")), None);
        assert_eq!(resolve_id(&json!("   ")), None);
        assert_eq!(resolve_id(&Value::Null), None);
        assert_eq!(resolve_id(&json!(true)), None);
    }

    #[test]
    fn test_key_priority() {
        assert_eq!(
            resolve_id(&json!({"code": "C", "uuid": "U", "_id": "M"})),
            Some("M".to_string())
        );
        assert_eq!(
            resolve_id(&json!({"id": "", "_id": "fallback"})),
            Some("fallback".to_string())
        );
        assert_eq!(resolve_id(&json!({"Id": 7})), Some("7".to_string()));
        assert_eq!(resolve_id(&json!({"name": "no id"})), None);
    }

    #[test]
    fn test_zero_id_is_absence() {
        assert_eq!(resolve_id(&json!({"id": 0})), None);
        assert_eq!(resolve_id(&json!({"id": 0, "code": "X1"})), Some("X1".to_string()));
    }

    #[test]
    fn test_oid_wrapper() {
        let record = json!({"_id": {"$oid": "65f0c0ffee"}});
        assert_eq!(resolve_id(&record), Some("65f0c0ffee".to_string()));
    }

    #[test]
    fn test_deterministic() {
        let record = json!({"guid": "g-1", "code": "c-1"});
        assert_eq!(resolve_id(&record), resolve_id(&record));
    }

    #[test]
    fn test_same_entity() {
        assert!(same_entity(&json!({"id": "A"}), &json!({"_id": "A"})));
        assert!(same_entity(&json!({"id": 5}), &json!("5")));
        assert!(!same_entity(&json!({"id": 0}), &json!({"id": 0})));
        assert!(has_id(&json!({"uuid": "u"}), "u"));
    }
}
