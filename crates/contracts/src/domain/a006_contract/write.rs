//! Canonical write payload for contract create/update
//!
//! The backend update endpoint wants the complete record, so both the deal
//! form and a funnel reassignment produce a full [`ContractWriteDto`].

use crate::domain::a001_reference::aggregate::ReferenceKind;
use crate::domain::a005_funnel::aggregate::to_backend_funnel_id;
use crate::shared::field_table::{first_array, parse_decimal};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::aggregate::{DealFormData, LINE_ITEMS};
use super::line_item::DealProduct;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractProductDto {
    pub product_id: String,
    pub price: f64,
    pub quantity: i64,
    pub discount: f64,
    pub vat: f64,
    pub serial_number: String,
    pub guarantee: String,
}

impl From<&DealProduct> for ContractProductDto {
    fn from(line: &DealProduct) -> Self {
        Self {
            product_id: line.id.clone(),
            price: line.price,
            quantity: line.quantity,
            discount: line.discount,
            vat: line.vat,
            serial_number: line.serial_number.clone(),
            guarantee: line.guarantee.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractWriteDto {
    pub client_id: String,
    pub counterparty_id: String,
    pub company_id: String,
    pub guarantee: String,
    pub comment: String,
    pub contract_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_date: Option<String>,
    pub contract_amount: f64,
    pub contract_currency: String,
    /// Real id or the zero sentinel
    pub funnel_id: String,
    pub pay_card: f64,
    pub pay_cash: f64,
    pub products: Vec<ContractProductDto>,
}

/// Submit-time rejection; nothing is sent upstream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Выберите клиента")]
    MissingClient,
    #[error("Выберите контрагента")]
    MissingCounterparty,
    #[error("Выберите компанию")]
    MissingCompany,
    #[error("Добавьте хотя бы один товар")]
    NoProducts,
    #[error("Некорректное число в поле {0}")]
    InvalidAmount(&'static str),
}

/// A stored contract that cannot be written back as is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("contract has no resolvable {field}")]
    MissingReference { field: &'static str },
    #[error("contract {field} is not a number")]
    InvalidAmount { field: &'static str },
}

/// First non-empty amount field that does not parse, by write field name
fn invalid_amount(form: &DealFormData) -> Option<&'static str> {
    [
        ("contract_amount", &form.deal_amount),
        ("pay_card", &form.pay_card),
        ("pay_cash", &form.pay_cash),
    ]
    .into_iter()
    .find(|(_, text)| !text.trim().is_empty() && parse_decimal(text).is_none())
    .map(|(field, _)| field)
}

impl ContractWriteDto {
    pub fn validate(form: &DealFormData, products: &[DealProduct]) -> Result<(), ValidationError> {
        if form.client_id.trim().is_empty() {
            return Err(ValidationError::MissingClient);
        }
        if form.counterparty_id.trim().is_empty() {
            return Err(ValidationError::MissingCounterparty);
        }
        if form.company_id.trim().is_empty() {
            return Err(ValidationError::MissingCompany);
        }
        if products.is_empty() {
            return Err(ValidationError::NoProducts);
        }
        if let Some(field) = invalid_amount(form) {
            return Err(ValidationError::InvalidAmount(field));
        }
        Ok(())
    }

    /// Payload for the deal form; validation is a separate step, empty
    /// amounts are written as 0
    pub fn from_form(form: &DealFormData, products: &[DealProduct]) -> Self {
        let amount = |text: &str| parse_decimal(text).unwrap_or(0.0);
        let deal_date = form.deal_date.trim();

        Self {
            client_id: form.client_id.clone(),
            counterparty_id: form.counterparty_id.clone(),
            company_id: form.company_id.clone(),
            guarantee: form.guarantee.clone(),
            comment: form.comment.clone(),
            contract_number: form.contract_number.clone(),
            deal_date: (!deal_date.is_empty()).then(|| deal_date.to_string()),
            contract_amount: amount(&form.deal_amount),
            contract_currency: form.currency.clone(),
            funnel_id: to_backend_funnel_id(&form.funnel_id),
            pay_card: amount(&form.pay_card),
            pay_cash: amount(&form.pay_cash),
            products: products.iter().map(ContractProductDto::from).collect(),
        }
    }

    /// Full payload that moves a stored contract to another funnel.
    ///
    /// Client, counterparty and company must all resolve; a gap means the
    /// stored record is broken and the move is refused.
    pub fn for_reassignment(raw: &Value, funnel_id: &str) -> Result<Self, WriteError> {
        let form = DealFormData::from_contract(raw);
        for kind in ReferenceKind::ALL {
            let value = match kind {
                ReferenceKind::Client => &form.client_id,
                ReferenceKind::Counterparty => &form.counterparty_id,
                ReferenceKind::Company => &form.company_id,
            };
            if value.is_empty() {
                return Err(WriteError::MissingReference {
                    field: kind.write_field(),
                });
            }
        }

        if let Some(field) = invalid_amount(&form) {
            return Err(WriteError::InvalidAmount { field });
        }

        let products: Vec<DealProduct> = first_array(raw, LINE_ITEMS)
            .map(|items| items.iter().map(DealProduct::from_contract_line).collect())
            .unwrap_or_default();

        let mut dto = Self::from_form(&form, &products);
        dto.funnel_id = to_backend_funnel_id(funnel_id);
        Ok(dto)
    }
}
