use crate::domain::a001_reference::aggregate::{display_name, ReferenceKind};
use crate::domain::a005_funnel::aggregate::{normalize_funnel_id, FunnelOption};
use crate::shared::field_table::{first_array, first_number, first_object, first_ref, first_text, FieldTable};
use crate::shared::record_id::resolve_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line_item::DealProduct;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Envelope keys for contract list and single-record responses
pub const ENVELOPE_KEYS: &[&str] = &["contracts", "contract", "deals", "deal"];

// ============================================================================
// Field tables
// ============================================================================

pub(crate) const FUNNEL_REF: FieldTable = &["funnel_id", "funnelId", "funnel"];
const FUNNEL_EMBEDDED: FieldTable = &["funnel"];
const WAREHOUSE_REF: FieldTable = &["warehouse_id", "warehouseId", "warehouse"];
const CONTRACT_NUMBER: FieldTable = &["contract_number", "contractNumber", "number"];
const DEAL_DATE: FieldTable = &["deal_date", "dealDate", "shipment_date", "shipmentDate", "date"];
const AMOUNT: FieldTable = &["contract_amount", "contractAmount", "deal_amount", "amount"];
const CURRENCY: FieldTable = &["contract_currency", "contractCurrency", "currency"];
const PAY_CARD: FieldTable = &["pay_card", "payCard", "card_amount"];
const PAY_CASH: FieldTable = &["pay_cash", "payCash", "cash_amount"];
const COMMENT: FieldTable = &["comment", "comments", "note"];
const GUARANTEE: FieldTable = &["guarantee", "warranty"];
pub(crate) const LINE_ITEMS: FieldTable = &["products", "items", "positions"];

// ============================================================================
// Deal form
// ============================================================================

/// Scalar draft of a deal. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealFormData {
    pub client_id: String,
    pub counterparty_id: String,
    pub company_id: String,
    pub warehouse_id: String,
    /// Canonical form: `""` for no funnel
    pub funnel_id: String,
    pub contract_number: String,
    /// `YYYY-MM-DD` or empty
    pub deal_date: String,
    /// Decimal text as typed
    pub deal_amount: String,
    pub currency: String,
    pub pay_card: String,
    pub pay_cash: String,
    pub comment: String,
    pub guarantee: String,
}

impl Default for DealFormData {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            counterparty_id: String::new(),
            company_id: String::new(),
            warehouse_id: String::new(),
            funnel_id: String::new(),
            contract_number: String::new(),
            deal_date: String::new(),
            deal_amount: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            pay_card: String::new(),
            pay_cash: String::new(),
            comment: String::new(),
            guarantee: String::new(),
        }
    }
}

/// Addressable scalar fields of [`DealFormData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealField {
    ClientId,
    CounterpartyId,
    CompanyId,
    WarehouseId,
    FunnelId,
    ContractNumber,
    DealDate,
    DealAmount,
    Currency,
    PayCard,
    PayCash,
    Comment,
    Guarantee,
}

impl DealFormData {
    pub fn get(&self, field: DealField) -> &str {
        match field {
            DealField::ClientId => &self.client_id,
            DealField::CounterpartyId => &self.counterparty_id,
            DealField::CompanyId => &self.company_id,
            DealField::WarehouseId => &self.warehouse_id,
            DealField::FunnelId => &self.funnel_id,
            DealField::ContractNumber => &self.contract_number,
            DealField::DealDate => &self.deal_date,
            DealField::DealAmount => &self.deal_amount,
            DealField::Currency => &self.currency,
            DealField::PayCard => &self.pay_card,
            DealField::PayCash => &self.pay_cash,
            DealField::Comment => &self.comment,
            DealField::Guarantee => &self.guarantee,
        }
    }

    /// Point mutation, no validation
    pub fn set(&mut self, field: DealField, value: String) {
        let slot = match field {
            DealField::ClientId => &mut self.client_id,
            DealField::CounterpartyId => &mut self.counterparty_id,
            DealField::CompanyId => &mut self.company_id,
            DealField::WarehouseId => &mut self.warehouse_id,
            DealField::FunnelId => &mut self.funnel_id,
            DealField::ContractNumber => &mut self.contract_number,
            DealField::DealDate => &mut self.deal_date,
            DealField::DealAmount => &mut self.deal_amount,
            DealField::Currency => &mut self.currency,
            DealField::PayCard => &mut self.pay_card,
            DealField::PayCash => &mut self.pay_cash,
            DealField::Comment => &mut self.comment,
            DealField::Guarantee => &mut self.guarantee,
        };
        *slot = value;
    }

    /// Map a raw contract record; missing values fall back to defaults
    pub fn from_contract(raw: &Value) -> Self {
        let defaults = Self::default();
        let reference = |kind: ReferenceKind| first_ref(raw, kind.contract_ref_fields()).unwrap_or_default();

        Self {
            client_id: reference(ReferenceKind::Client),
            counterparty_id: reference(ReferenceKind::Counterparty),
            company_id: reference(ReferenceKind::Company),
            warehouse_id: first_ref(raw, WAREHOUSE_REF).unwrap_or_default(),
            funnel_id: normalize_funnel_id(first_ref(raw, FUNNEL_REF).as_deref()),
            contract_number: first_text(raw, CONTRACT_NUMBER).unwrap_or_default(),
            deal_date: first_text(raw, DEAL_DATE).map(|d| date_part(&d)).unwrap_or_default(),
            deal_amount: first_text(raw, AMOUNT).unwrap_or_default(),
            currency: first_text(raw, CURRENCY).unwrap_or(defaults.currency),
            pay_card: first_text(raw, PAY_CARD).unwrap_or_default(),
            pay_cash: first_text(raw, PAY_CASH).unwrap_or_default(),
            comment: first_text(raw, COMMENT).unwrap_or_default(),
            guarantee: first_text(raw, GUARANTEE).unwrap_or_default(),
        }
    }
}

/// `2024-03-15T10:00:00Z` -> `2024-03-15`; anything unparsable is kept as is
pub fn date_part(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    match raw.split_once('T') {
        Some((date, _)) if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() => {
            date.to_string()
        }
        _ => raw.to_string(),
    }
}

/// Form data plus line items as read from one contract record
pub fn hydrate_from_contract(raw: &Value) -> (DealFormData, Vec<DealProduct>) {
    let products = first_array(raw, LINE_ITEMS)
        .map(|items| items.iter().map(DealProduct::from_contract_line).collect())
        .unwrap_or_default();
    (DealFormData::from_contract(raw), products)
}

// ============================================================================
// Board card
// ============================================================================

/// Denormalized contract as shown on the Kanban board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCard {
    pub id: String,
    pub contract_number: String,
    pub client_id: String,
    pub client_name: Option<String>,
    pub counterparty_id: String,
    pub counterparty_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub deal_date: String,
    /// Funnel reference as stored, possibly the zero sentinel
    pub funnel_ref: String,
    /// Embedded funnel, when the record or a local move attached one
    pub funnel: Option<FunnelOption>,
}

impl ContractCard {
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let id = resolve_id(raw)?;
        let embedded_name = |kind: ReferenceKind| {
            first_object(raw, kind.embedded_fields()).and_then(display_name)
        };

        Some(Self {
            id,
            contract_number: first_text(raw, CONTRACT_NUMBER).unwrap_or_default(),
            client_id: first_ref(raw, ReferenceKind::Client.contract_ref_fields()).unwrap_or_default(),
            client_name: embedded_name(ReferenceKind::Client),
            counterparty_id: first_ref(raw, ReferenceKind::Counterparty.contract_ref_fields())
                .unwrap_or_default(),
            counterparty_name: embedded_name(ReferenceKind::Counterparty),
            amount: first_number(raw, AMOUNT).unwrap_or(0.0),
            currency: first_text(raw, CURRENCY).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            deal_date: first_text(raw, DEAL_DATE).map(|d| date_part(&d)).unwrap_or_default(),
            funnel_ref: first_ref(raw, FUNNEL_REF).unwrap_or_default(),
            funnel: first_object(raw, FUNNEL_EMBEDDED).and_then(FunnelOption::from_raw),
        })
    }

    /// Canonical funnel id (`""` when unassigned)
    pub fn funnel_id(&self) -> String {
        normalize_funnel_id(Some(&self.funnel_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a005_funnel::aggregate::ZERO_FUNNEL_ID;
    use serde_json::json;

    fn sample_contract() -> Value {
        json!({
            "_id": "K1",
            "client": {"_id": "CL1", "first_name": "Ivan", "last_name": "Petrov"},
            "counterpartyId": "CP1",
            "company_id": 17,
            "funnel": {"id": "F1", "name": "Новые", "order": 1},
            "contractNumber": "2024/15",
            "deal_date": "2024-03-15T10:00:00.000Z",
            "contract_amount": 1500,
            "contract_currency": "UZS",
            "pay_card": 500,
            "pay_cash": "1000",
            "comment": "call first",
            "items": [
                {"product": {"_id": "P1", "name": "Drill"}, "quantity": 2, "price": 750, "vat": 12}
            ]
        })
    }

    #[test]
    fn test_hydrate_full_record() {
        let (form, products) = hydrate_from_contract(&sample_contract());
        assert_eq!(form.client_id, "CL1");
        assert_eq!(form.counterparty_id, "CP1");
        assert_eq!(form.company_id, "17");
        assert_eq!(form.funnel_id, "F1");
        assert_eq!(form.contract_number, "2024/15");
        assert_eq!(form.deal_date, "2024-03-15");
        assert_eq!(form.deal_amount, "1500");
        assert_eq!(form.currency, "UZS");
        assert_eq!(form.pay_card, "500");
        assert_eq!(form.pay_cash, "1000");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "P1");
        assert_eq!(products[0].quantity, 2);
    }

    #[test]
    fn test_hydrate_sparse_record_is_fully_defaulted() {
        let (form, products) = hydrate_from_contract(&json!({"id": "K2"}));
        assert_eq!(form, DealFormData::default());
        assert_eq!(form.currency, DEFAULT_CURRENCY);
        assert!(products.is_empty());
    }

    #[test]
    fn test_line_item_keys_first_non_empty_wins() {
        let raw = json!({
            "id": "K3",
            "products": [],
            "items": [{"product_id": "A"}],
            "positions": [{"product_id": "B"}, {"product_id": "C"}]
        });
        let (_, products) = hydrate_from_contract(&raw);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "A");
    }

    #[test]
    fn test_sentinel_funnel_hydrates_as_unassigned() {
        let raw = json!({"id": "K4", "funnel_id": ZERO_FUNNEL_ID});
        assert_eq!(DealFormData::from_contract(&raw).funnel_id, "");
        let raw = json!({"id": "K5", "funnelId": "null"});
        assert_eq!(DealFormData::from_contract(&raw).funnel_id, "");
    }

    #[test]
    fn test_set_and_get_field() {
        let mut form = DealFormData::default();
        form.set(DealField::ContractNumber, "A-1".to_string());
        form.set(DealField::Currency, "EUR".to_string());
        assert_eq!(form.get(DealField::ContractNumber), "A-1");
        assert_eq!(form.get(DealField::Currency), "EUR");
        assert_eq!(form.get(DealField::Comment), "");
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-03-15T23:30:00+05:00"), "2024-03-15");
        assert_eq!(date_part("2024-03-15T10:00:00"), "2024-03-15");
        assert_eq!(date_part("2024-03-15"), "2024-03-15");
        assert_eq!(date_part("someday"), "someday");
    }

    #[test]
    fn test_contract_card() {
        let card = ContractCard::from_raw(&sample_contract()).unwrap();
        assert_eq!(card.id, "K1");
        assert_eq!(card.client_name.as_deref(), Some("Ivan Petrov"));
        assert_eq!(card.counterparty_name, None);
        assert_eq!(card.amount, 1500.0);
        assert_eq!(card.funnel_ref, "F1");
        assert_eq!(card.funnel.as_ref().map(|f| f.name.as_str()), Some("Новые"));
        assert_eq!(card.funnel_id(), "F1");

        let unassigned = ContractCard::from_raw(&json!({"id": "K9", "funnel_id": ZERO_FUNNEL_ID})).unwrap();
        assert_eq!(unassigned.funnel_id(), "");
    }
}
