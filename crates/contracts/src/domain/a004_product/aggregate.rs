use crate::shared::field_table::{first_number, first_text, FieldTable};
use crate::shared::record_id::resolve_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ENVELOPE_KEYS: &[&str] = &["products", "goods"];

const NAME: FieldTable = &["name", "title", "product_name", "productName"];
const SERIAL: FieldTable = &["serial_number", "serialNumber", "sku", "article"];
const BARCODE: FieldTable = &["barcode", "bar_code", "barCode", "ean"];
const PRICE: FieldTable = &["price", "sale_price", "salePrice", "selling_price"];
const VAT: FieldTable = &["vat", "vat_percent", "vatPercent", "nds"];
const GUARANTEE: FieldTable = &["guarantee", "warranty"];

/// Catalog product as offered for a deal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub serial_number: String,
    pub barcode: String,
    pub price: f64,
    pub vat: f64,
    pub guarantee: String,
}

impl ProductOption {
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let id = resolve_id(raw)?;
        Some(Self {
            name: first_text(raw, NAME).unwrap_or_else(|| id.clone()),
            id,
            serial_number: first_text(raw, SERIAL).unwrap_or_default(),
            barcode: first_text(raw, BARCODE).unwrap_or_default(),
            price: first_number(raw, PRICE).unwrap_or(0.0),
            vat: first_number(raw, VAT).unwrap_or(0.0),
            guarantee: first_text(raw, GUARANTEE).unwrap_or_default(),
        })
    }

    pub fn from_raw_list(items: &[Value]) -> Vec<Self> {
        items.iter().filter_map(Self::from_raw).collect()
    }

    /// Barcode scanners and manual search both land here
    pub fn matches_code(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty()
            && (self.barcode.eq_ignore_ascii_case(code)
                || self.serial_number.eq_ignore_ascii_case(code)
                || self.id == code)
    }
}
