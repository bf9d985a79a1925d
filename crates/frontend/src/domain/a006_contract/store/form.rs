use contracts::domain::a004_product::ProductOption;
use contracts::domain::a006_contract::aggregate::hydrate_from_contract;
use contracts::domain::a006_contract::line_item::format_amount;
use contracts::domain::a006_contract::{deal_total, DealField, DealFormData, DealProduct, ProductField};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// In-progress deal draft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub data: DealFormData,
    pub products: Vec<DealProduct>,
    pub initialized: bool,
    pub mode: FormMode,
    /// Contract being edited, set by hydration
    pub editing_id: Option<String>,
    pub submitting: bool,
}

impl FormState {
    /// Create mode resets once per session so re-entering the page keeps
    /// in-progress edits; switching from edit to create also resets.
    /// Edit mode only marks the form initialized, data comes from hydration.
    pub fn initialize(&mut self, mode: FormMode) {
        match mode {
            FormMode::Create => {
                if !self.initialized || self.mode != FormMode::Create {
                    self.data = DealFormData::default();
                    self.products.clear();
                    self.editing_id = None;
                }
            }
            FormMode::Edit => {}
        }
        self.mode = mode;
        self.initialized = true;
    }

    pub fn hydrate(&mut self, contract_id: Option<String>, raw: &Value) {
        let (data, products) = hydrate_from_contract(raw);
        self.data = data;
        self.products = products;
        self.editing_id = contract_id;
    }

    pub fn set_field(&mut self, field: DealField, value: String) {
        self.data.set(field, value);
    }

    /// Returns the new line's uid
    pub fn add_product(&mut self, product: &ProductOption) -> String {
        let line = DealProduct::from_product(product);
        let uid = line.uid.clone();
        self.products.push(line);
        uid
    }

    pub fn remove_product(&mut self, uid: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|line| line.uid != uid);
        self.products.len() != before
    }

    pub fn set_product_field(&mut self, uid: &str, field: ProductField, value: &str) -> bool {
        self.products
            .iter_mut()
            .find(|line| line.uid == uid)
            .map(|line| line.set(field, value))
            .unwrap_or(false)
    }

    pub fn total(&self) -> f64 {
        deal_total(&self.products)
    }

    /// Deal amount follows the line totals
    pub fn sync_amount_from_products(&mut self) {
        self.data.deal_amount = format_amount(self.total());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
