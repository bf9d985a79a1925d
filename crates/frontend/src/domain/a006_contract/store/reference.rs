use contracts::domain::a001_reference::{NamedOption, ReferenceKind};
use contracts::domain::a004_product::aggregate::{ProductOption, ENVELOPE_KEYS as PRODUCT_KEYS};
use contracts::domain::a005_funnel::aggregate::sort_by_order;
use contracts::domain::a005_funnel::FunnelOption;
use contracts::shared::envelope::extract_array;
use serde_json::Value;

/// Single-flight guard of one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheGate {
    loaded: bool,
    loading: bool,
}

impl CacheGate {
    /// `true` when a fetch should start; the gate is then marked loading.
    ///
    /// A fetch already in flight is never duplicated, forced or not.
    pub fn try_begin(&mut self, force: bool) -> bool {
        if self.loading || (self.loaded && !force) {
            return false;
        }
        self.loading = true;
        true
    }

    /// Failure keeps the previous `loaded` value along with the cached data
    pub fn finish(&mut self, ok: bool) {
        self.loading = false;
        if ok {
            self.loaded = true;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Lookup collections cached for the deal pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceState {
    pub clients: Vec<NamedOption>,
    pub counterparties: Vec<NamedOption>,
    pub companies: Vec<NamedOption>,
    pub products: Vec<ProductOption>,
    pub funnels: Vec<FunnelOption>,
    pub references_gate: CacheGate,
    pub products_gate: CacheGate,
    pub funnels_gate: CacheGate,
}

impl ReferenceState {
    pub fn options(&self, kind: ReferenceKind) -> &[NamedOption] {
        match kind {
            ReferenceKind::Client => &self.clients,
            ReferenceKind::Counterparty => &self.counterparties,
            ReferenceKind::Company => &self.companies,
        }
    }

    pub fn set_options(&mut self, kind: ReferenceKind, options: Vec<NamedOption>) {
        match kind {
            ReferenceKind::Client => self.clients = options,
            ReferenceKind::Counterparty => self.counterparties = options,
            ReferenceKind::Company => self.companies = options,
        }
    }

    pub fn label(&self, kind: ReferenceKind, id: &str) -> Option<&str> {
        contracts::domain::a001_reference::label_of(self.options(kind), id)
    }

    pub fn product(&self, id: &str) -> Option<&ProductOption> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Barcode / serial / id lookup used by the scanner input
    pub fn find_product_by_code(&self, code: &str) -> Option<&ProductOption> {
        self.products.iter().find(|p| p.matches_code(code))
    }

    pub fn funnel(&self, id: &str) -> Option<&FunnelOption> {
        self.funnels.iter().find(|f| f.id == id)
    }
}

pub fn normalize_references(kind: ReferenceKind, response: &Value) -> Vec<NamedOption> {
    NamedOption::from_raw_list(&extract_array(response, kind.envelope_keys()), kind)
}

pub fn normalize_products(response: &Value) -> Vec<ProductOption> {
    ProductOption::from_raw_list(&extract_array(response, PRODUCT_KEYS))
}

/// Funnels sorted by their stored order
pub fn normalize_funnels(response: &Value) -> Vec<FunnelOption> {
    let mut funnels: Vec<FunnelOption> = extract_array(response, &["funnels"])
        .iter()
        .filter_map(FunnelOption::from_raw)
        .collect();
    sort_by_order(&mut funnels);
    funnels
}
