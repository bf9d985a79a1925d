use crate::shared::field_table::{first_text, FieldTable};
use crate::shared::record_id::resolve_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference collections that share the id + label shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Client,
    Counterparty,
    Company,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [Self::Client, Self::Counterparty, Self::Company];

    /// Entity-specific envelope keys for list responses
    pub fn envelope_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Client => &["clients", "customers"],
            Self::Counterparty => &["counterparties", "counterparty", "contractors"],
            Self::Company => &["companies", "organizations"],
        }
    }

    /// Label used when a record carries no usable name
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Self::Client => "Клиент без имени",
            Self::Counterparty => "Контрагент без названия",
            Self::Company => "Компания без названия",
        }
    }

    /// Contract fields holding a reference of this kind
    pub fn contract_ref_fields(&self) -> FieldTable {
        match self {
            Self::Client => &["client_id", "clientId", "client"],
            Self::Counterparty => &["counterparty_id", "counterpartyId", "counterparty"],
            Self::Company => &["company_id", "companyId", "company"],
        }
    }

    /// Fields that may carry the referenced record embedded as an object
    pub fn embedded_fields(&self) -> FieldTable {
        match self {
            Self::Client => &["client"],
            Self::Counterparty => &["counterparty"],
            Self::Company => &["company"],
        }
    }

    /// Field name in the canonical write payload
    pub fn write_field(&self) -> &'static str {
        match self {
            Self::Client => "client_id",
            Self::Counterparty => "counterparty_id",
            Self::Company => "company_id",
        }
    }
}

const FIRST_NAME: FieldTable = &["first_name", "firstName", "firstname"];
const LAST_NAME: FieldTable = &["last_name", "lastName", "lastname", "surname"];
const SINGLE_NAME: FieldTable = &["name", "full_name", "fullName", "company", "title"];
const EXTRA: FieldTable = &["phone", "phone_number", "inn", "tin", "email"];

/// Id + display label for a select list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl NamedOption {
    /// Map a raw record; `None` when it has no resolvable id
    pub fn from_raw(raw: &Value, fallback: &str) -> Option<Self> {
        let id = resolve_id(raw)?;
        Some(Self {
            id,
            name: display_name(raw).unwrap_or_else(|| fallback.to_string()),
            extra: first_text(raw, EXTRA),
        })
    }

    pub fn from_raw_list(items: &[Value], kind: ReferenceKind) -> Vec<Self> {
        items
            .iter()
            .filter_map(|raw| Self::from_raw(raw, kind.fallback_label()))
            .collect()
    }
}

/// "First Last" wins over a single name field
pub fn display_name(raw: &Value) -> Option<String> {
    let composed = [first_text(raw, FIRST_NAME), first_text(raw, LAST_NAME)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if !composed.is_empty() {
        return Some(composed);
    }
    first_text(raw, SINGLE_NAME)
}

/// Label of `id` in `options`, if present
pub fn label_of<'a>(options: &'a [NamedOption], id: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_composed_name_preferred() {
        let raw = json!({"id": "c1", "first_name": "Anna", "lastName": "Ivanova", "name": "ignored"});
        let option = NamedOption::from_raw(&raw, "x").unwrap();
        assert_eq!(option.name, "Anna Ivanova");
    }

    #[test]
    fn test_partial_name() {
        let raw = json!({"id": "c1", "last_name": "Petrov"});
        assert_eq!(NamedOption::from_raw(&raw, "x").unwrap().name, "Petrov");
    }

    #[test]
    fn test_single_field_fallbacks() {
        let company = json!({"_id": "k", "company": "ООО Ромашка", "inn": "7701"});
        let option = NamedOption::from_raw(&company, "x").unwrap();
        assert_eq!(option.name, "ООО Ромашка");
        assert_eq!(option.extra.as_deref(), Some("7701"));

        let nameless = json!({"uuid": "u"});
        assert_eq!(NamedOption::from_raw(&nameless, "Без имени").unwrap().name, "Без имени");
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let items = vec![json!({"name": "ghost"}), json!({"id": 3, "title": "Real"})];
        let options = NamedOption::from_raw_list(&items, ReferenceKind::Company);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, "3");
        assert_eq!(label_of(&options, "3"), Some("Real"));
    }
}
