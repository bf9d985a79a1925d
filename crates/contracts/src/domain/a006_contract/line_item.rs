use crate::domain::a004_product::aggregate::ProductOption;
use crate::shared::field_table::{first_number, first_ref, first_text, parse_decimal, FieldTable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const PRODUCT_REF: FieldTable = &["product_id", "productId", "product", "id", "_id"];
const NAME: FieldTable = &["name", "product_name", "productName", "product.name", "product.title", "title"];
const SERIAL: FieldTable = &["serial_number", "serialNumber", "product.serial_number", "product.serialNumber"];
const QUANTITY: FieldTable = &["quantity", "qty", "count"];
const PRICE: FieldTable = &["price", "unit_price", "unitPrice", "product.price"];
const VAT: FieldTable = &["vat", "vat_percent", "vatPercent", "nds"];
const DISCOUNT: FieldTable = &["discount", "discount_percent", "discountPercent"];
const GUARANTEE: FieldTable = &["guarantee", "warranty", "product.guarantee"];

/// One product line of the deal draft.
///
/// `uid` is generated per line, so the same product can appear twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealProduct {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub serial_number: String,
    pub quantity: i64,
    pub price: f64,
    pub vat: f64,
    pub discount: f64,
    pub guarantee: String,
}

/// Editable line fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    SerialNumber,
    Quantity,
    Price,
    Vat,
    Discount,
    Guarantee,
}

pub fn new_uid() -> String {
    Uuid::new_v4().to_string()
}

impl DealProduct {
    /// Fresh line for a catalog product, quantity 1
    pub fn from_product(product: &ProductOption) -> Self {
        Self {
            id: product.id.clone(),
            uid: new_uid(),
            name: product.name.clone(),
            serial_number: product.serial_number.clone(),
            quantity: 1,
            price: product.price,
            vat: product.vat,
            discount: 0.0,
            guarantee: product.guarantee.clone(),
        }
    }

    /// Map one line of a stored contract
    pub fn from_contract_line(raw: &Value) -> Self {
        Self {
            id: first_ref(raw, PRODUCT_REF).unwrap_or_default(),
            uid: new_uid(),
            name: first_text(raw, NAME).unwrap_or_default(),
            serial_number: first_text(raw, SERIAL).unwrap_or_default(),
            quantity: first_number(raw, QUANTITY).map(|q| q.round() as i64).unwrap_or(1),
            price: first_number(raw, PRICE).unwrap_or(0.0),
            vat: first_number(raw, VAT).unwrap_or(0.0),
            discount: first_number(raw, DISCOUNT).unwrap_or(0.0),
            guarantee: first_text(raw, GUARANTEE).unwrap_or_default(),
        }
    }

    /// Apply a typed value; numbers that do not parse leave the line untouched
    pub fn set(&mut self, field: ProductField, value: &str) -> bool {
        let value = value.trim();
        match field {
            ProductField::SerialNumber => self.serial_number = value.to_string(),
            ProductField::Guarantee => self.guarantee = value.to_string(),
            ProductField::Quantity => match value.parse::<i64>() {
                Ok(q) => self.quantity = q,
                Err(_) => return false,
            },
            ProductField::Price | ProductField::Vat | ProductField::Discount => {
                let Some(number) = parse_decimal(value) else {
                    return false;
                };
                match field {
                    ProductField::Price => self.price = number,
                    ProductField::Vat => self.vat = number,
                    _ => self.discount = number,
                }
            }
        }
        true
    }

    /// price x quantity, less discount %, plus VAT %
    pub fn line_total(&self) -> f64 {
        let gross = self.price * self.quantity as f64;
        let discounted = gross * (1.0 - self.discount / 100.0);
        discounted * (1.0 + self.vat / 100.0)
    }
}

pub fn deal_total(products: &[DealProduct]) -> f64 {
    products.iter().map(DealProduct::line_total).sum()
}

/// Render an amount for a decimal text field without a trailing `.0`
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
