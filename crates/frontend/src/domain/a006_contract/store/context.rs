use super::{DealState, DealStore};
use crate::shared::crm_api::HttpCrmApi;
use leptos::prelude::*;

/// Store wired to the reactive state and the real backend
pub type AppDealStore = DealStore<RwSignal<DealState>, HttpCrmApi>;

/// Create the application store and put it into context
pub fn provide_deal_store() -> AppDealStore {
    let store = DealStore::new(RwSignal::new(DealState::default()), HttpCrmApi::new());
    provide_context(store.clone());
    store
}

pub fn use_deal_store() -> AppDealStore {
    use_context::<AppDealStore>().expect("DealStore context not found")
}
