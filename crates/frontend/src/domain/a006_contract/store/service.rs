use super::form::FormMode;
use super::reference::{normalize_funnels, normalize_products, normalize_references, CacheGate, ReferenceState};
use super::{DealError, DealState, DealStore};
use crate::shared::api_utils::{ListParams, BOARD_PAGE_LIMIT, REFERENCE_PAGE_LIMIT};
use crate::shared::crm_api::CrmApi;
use crate::shared::state::{CancelFlag, NoticeLevel, StoreCell};
use contracts::domain::a001_reference::ReferenceKind;
use contracts::domain::a004_product::ProductOption;
use contracts::domain::a006_contract::aggregate::ENVELOPE_KEYS as CONTRACT_KEYS;
use contracts::domain::a006_contract::{ContractCard, ContractWriteDto, DealField, ProductField};
use contracts::shared::envelope::{extract_array, extract_record};
use contracts::shared::record_id::resolve_id;
use futures_util::future::try_join3;
use serde_json::Value;

/// The three independently gated caches
#[derive(Debug, Clone, Copy)]
enum Cache {
    References,
    Products,
    Funnels,
}

impl Cache {
    fn gate(self, reference: &mut ReferenceState) -> &mut CacheGate {
        match self {
            Self::References => &mut reference.references_gate,
            Self::Products => &mut reference.products_gate,
            Self::Funnels => &mut reference.funnels_gate,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::References => "Не удалось загрузить справочники",
            Self::Products => "Не удалось загрузить товары",
            Self::Funnels => "Не удалось загрузить воронки",
        }
    }
}

/// Fill names the record did not embed from the reference cache
fn denormalize(card: &mut ContractCard, reference: &ReferenceState) {
    if card.client_name.is_none() {
        card.client_name = reference
            .label(ReferenceKind::Client, &card.client_id)
            .map(str::to_string);
    }
    if card.counterparty_name.is_none() {
        card.counterparty_name = reference
            .label(ReferenceKind::Counterparty, &card.counterparty_id)
            .map(str::to_string);
    }
}

impl<C, A> DealStore<C, A>
where
    C: StoreCell<DealState>,
    A: CrmApi + 'static,
{
    // ========================================================================
    // Reference data
    // ========================================================================

    fn begin_load(&self, cache: Cache, force: bool) -> bool {
        let mut started = false;
        self.state
            .mutate(|s| started = cache.gate(&mut s.reference).try_begin(force));
        started
    }

    /// Close the gate, keep whatever was cached before, surface the error
    fn fail_load(&self, cache: Cache, message: String) -> DealError {
        log::error!("{}: {}", cache.label(), message);
        self.state.mutate(|s| {
            cache.gate(&mut s.reference).finish(false);
            s.notices
                .push(NoticeLevel::Error, format!("{}: {}", cache.label(), message));
            s.error = Some(message.clone());
        });
        DealError::Api(message)
    }

    /// Clients, counterparties and companies in one go, then funnels.
    ///
    /// No-op when loaded and not forced, or while a load is running.
    pub async fn load_reference_data(&self, force: bool) -> Result<(), DealError> {
        if !self.begin_load(Cache::References, force) {
            return Ok(());
        }

        let params = ListParams::limit(REFERENCE_PAGE_LIMIT);
        let fetched = try_join3(
            self.api.get_references(ReferenceKind::Client, &params),
            self.api.get_references(ReferenceKind::Counterparty, &params),
            self.api.get_references(ReferenceKind::Company, &params),
        )
        .await;

        let (clients, counterparties, companies) = match fetched {
            Ok(responses) => responses,
            Err(e) => return Err(self.fail_load(Cache::References, e)),
        };

        let clients = normalize_references(ReferenceKind::Client, &clients);
        let counterparties = normalize_references(ReferenceKind::Counterparty, &counterparties);
        let companies = normalize_references(ReferenceKind::Company, &companies);
        log::debug!(
            "reference data: {} clients, {} counterparties, {} companies",
            clients.len(),
            counterparties.len(),
            companies.len()
        );

        self.state.mutate(|s| {
            s.reference.set_options(ReferenceKind::Client, clients);
            s.reference.set_options(ReferenceKind::Counterparty, counterparties);
            s.reference.set_options(ReferenceKind::Company, companies);
            s.reference.references_gate.finish(true);
            s.error = None;
        });

        self.load_funnels(force).await
    }

    pub async fn load_products(&self, force: bool) -> Result<(), DealError> {
        if !self.begin_load(Cache::Products, force) {
            return Ok(());
        }

        let response = match self
            .api
            .get_products(&ListParams::limit(REFERENCE_PAGE_LIMIT))
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(self.fail_load(Cache::Products, e)),
        };

        let products = normalize_products(&response);
        log::debug!("products loaded: {}", products.len());
        self.state.mutate(|s| {
            s.reference.products = products;
            s.reference.products_gate.finish(true);
        });
        Ok(())
    }

    /// Funnels feed the board columns as well
    pub async fn load_funnels(&self, force: bool) -> Result<(), DealError> {
        if !self.begin_load(Cache::Funnels, force) {
            return Ok(());
        }

        let response = match self
            .api
            .get_funnels(&ListParams::limit(REFERENCE_PAGE_LIMIT))
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(self.fail_load(Cache::Funnels, e)),
        };

        let funnels = normalize_funnels(&response);
        log::debug!("funnels loaded: {}", funnels.len());
        self.state.mutate(|s| {
            s.board.sync_columns(&funnels);
            s.reference.funnels = funnels;
            s.reference.funnels_gate.finish(true);
        });
        Ok(())
    }

    // ========================================================================
    // Board population
    // ========================================================================

    /// Contracts for the board; results arriving after `cancel` are dropped
    pub async fn load_contracts(&self, cancel: &CancelFlag) -> Result<(), DealError> {
        let mut started = false;
        self.state.mutate(|s| {
            if !s.board.contracts_loading {
                s.board.contracts_loading = true;
                started = true;
            }
        });
        if !started {
            return Ok(());
        }

        let result = self
            .api
            .get_contracts(&ListParams::limit(BOARD_PAGE_LIMIT))
            .await;

        if cancel.is_cancelled() {
            log::debug!("contracts response dropped: page closed");
            self.state.mutate(|s| s.board.contracts_loading = false);
            return Ok(());
        }

        match result {
            Ok(response) => {
                let mut cards: Vec<ContractCard> = extract_array(&response, CONTRACT_KEYS)
                    .iter()
                    .filter_map(ContractCard::from_raw)
                    .collect();
                self.state.mutate(|s| {
                    for card in cards.iter_mut() {
                        denormalize(card, &s.reference);
                    }
                    s.board.contracts = cards;
                    s.board.contracts_loaded = true;
                    s.board.contracts_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                log::error!("Не удалось загрузить сделки: {}", e);
                self.state.mutate(|s| {
                    s.board.contracts_loading = false;
                    s.error = Some(e.clone());
                    s.notices
                        .push(NoticeLevel::Error, format!("Не удалось загрузить сделки: {}", e));
                });
                Err(DealError::Api(e))
            }
        }
    }

    /// Everything the board page needs; each cache reports its own failure
    pub async fn load_board(&self, cancel: &CancelFlag) -> Result<(), DealError> {
        let references = self.load_reference_data(false).await;
        let funnels = self.load_funnels(false).await;
        let contracts = self.load_contracts(cancel).await;
        references.and(funnels).and(contracts)
    }

    // ========================================================================
    // Deal form
    // ========================================================================

    pub fn initialize_form(&self, mode: FormMode) {
        self.state.mutate(|s| s.form.initialize(mode));
    }

    /// Replace the draft with a stored contract
    pub fn hydrate_from_contract(&self, raw: &Value) {
        let contract_id = resolve_id(raw);
        self.state.mutate(|s| s.form.hydrate(contract_id, raw));
    }

    /// Edit page entry: fetch, then hydrate unless the page closed meanwhile
    pub async fn load_contract_for_edit(&self, id: &str, cancel: &CancelFlag) -> Result<(), DealError> {
        // a draft left from another page must not show up under this contract
        self.state.mutate(|s| {
            s.form.reset();
            s.form.initialize(FormMode::Edit);
        });

        let response = match self.api.get_contract_by_id(id).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Не удалось загрузить сделку {}: {}", id, e);
                self.state.mutate(|s| {
                    s.error = Some(e.clone());
                    s.notices
                        .push(NoticeLevel::Error, format!("Не удалось загрузить сделку: {}", e));
                });
                return Err(DealError::Api(e));
            }
        };

        if cancel.is_cancelled() {
            return Ok(());
        }

        let raw = extract_record(&response, CONTRACT_KEYS);
        let contract_id = resolve_id(&raw).unwrap_or_else(|| id.to_string());
        self.state.mutate(|s| s.form.hydrate(Some(contract_id), &raw));
        Ok(())
    }

    pub fn set_form_field(&self, field: DealField, value: String) {
        self.state.mutate(|s| s.form.set_field(field, value));
    }

    /// Append a line for `product`; returns the line uid
    pub fn add_product_to_deal(&self, product: &ProductOption) -> String {
        let mut uid = String::new();
        self.state.mutate(|s| uid = s.form.add_product(product));
        uid
    }

    pub fn remove_product_from_deal(&self, uid: &str) {
        self.state.mutate(|s| {
            s.form.remove_product(uid);
        });
    }

    pub fn set_product_field(&self, uid: &str, field: ProductField, value: &str) -> bool {
        let mut changed = false;
        self.state
            .mutate(|s| changed = s.form.set_product_field(uid, field, value));
        changed
    }

    pub fn sync_amount_from_products(&self) {
        self.state.mutate(|s| s.form.sync_amount_from_products());
    }

    pub fn find_product_by_code(&self, code: &str) -> Option<ProductOption> {
        self.state
            .peek(|s| s.reference.find_product_by_code(code.trim()).cloned())
    }

    /// Barcode scanner entry; unknown codes raise a warning
    pub fn add_product_by_code(&self, code: &str) -> Option<String> {
        match self.find_product_by_code(code) {
            Some(product) => Some(self.add_product_to_deal(&product)),
            None => {
                self.notify(NoticeLevel::Warning, format!("Товар с кодом «{}» не найден", code.trim()));
                None
            }
        }
    }

    pub fn reset_deal(&self) {
        self.state.mutate(|s| s.form.reset());
    }

    // ========================================================================
    // Contract writes
    // ========================================================================

    /// Validate, then create or update. Returns the stored contract id.
    pub async fn submit_deal(&self) -> Result<String, DealError> {
        let (data, products, mode, editing_id, submitting) = self.state.peek(|s| {
            (
                s.form.data.clone(),
                s.form.products.clone(),
                s.form.mode,
                s.form.editing_id.clone(),
                s.form.submitting,
            )
        });
        if submitting {
            return Err(DealError::Api("Сделка уже сохраняется".to_string()));
        }
        if mode == FormMode::Edit && editing_id.is_none() {
            log::warn!("edit submit without a loaded contract");
            self.notify(NoticeLevel::Warning, DealError::EditTargetMissing.to_string());
            return Err(DealError::EditTargetMissing);
        }

        if let Err(e) = ContractWriteDto::validate(&data, &products) {
            log::warn!("deal rejected: {}", e);
            self.notify(NoticeLevel::Warning, e.to_string());
            return Err(e.into());
        }

        let payload = ContractWriteDto::from_form(&data, &products);
        self.state.mutate(|s| s.form.submitting = true);

        let saved = match (mode, editing_id) {
            (FormMode::Edit, Some(id)) => self.api.update_contract(&id, &payload).await.map(|_| id),
            _ => self
                .api
                .create_contract(&payload)
                .await
                .map(|response| resolve_id(&extract_record(&response, CONTRACT_KEYS)).unwrap_or_default()),
        };

        let id = match saved {
            Ok(id) => id,
            Err(e) => {
                log::error!("Не удалось сохранить сделку: {}", e);
                self.state.mutate(|s| {
                    s.form.submitting = false;
                    s.notices
                        .push(NoticeLevel::Error, format!("Не удалось сохранить сделку: {}", e));
                });
                return Err(DealError::Api(e));
            }
        };

        log::info!("deal saved: {}", id);
        let refresh = self.state.peek(|s| s.board.contracts_loaded);
        self.state.mutate(|s| {
            s.form.reset();
            s.notices.push(NoticeLevel::Success, "Сделка сохранена");
        });
        if refresh {
            // the save already succeeded; a failed refresh reports itself
            let _ = self.load_contracts(&CancelFlag::new()).await;
        }
        Ok(id)
    }

    pub async fn delete_contract(&self, id: &str) -> Result<(), DealError> {
        if let Err(e) = self.api.delete_contract(id).await {
            log::error!("Не удалось удалить сделку {}: {}", id, e);
            self.notify(NoticeLevel::Error, format!("Не удалось удалить сделку: {}", e));
            return Err(DealError::Api(e));
        }
        self.state.mutate(|s| {
            s.board.remove_card(id);
            s.notices.push(NoticeLevel::Success, "Сделка удалена");
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::crm_api::mock::{contracts_fixture, funnels_response, MockCrmApi, Op};
    use contracts::domain::a005_funnel::ZERO_FUNNEL_ID;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type TestStore = DealStore<Rc<RefCell<DealState>>, MockCrmApi>;

    fn store_with(api: MockCrmApi) -> TestStore {
        DealStore::new(Rc::new(RefCell::new(DealState::default())), api)
    }

    fn seeded_api() -> MockCrmApi {
        MockCrmApi::new()
            .with_list(Op::GetClients, json!({"data": {"clients": [{"_id": "CL1", "first_name": "Ivan", "last_name": "Petrov"}]}}))
            .with_list(Op::GetCounterparties, json!([{"id": "CP1", "name": "Acme"}]))
            .with_list(Op::GetCompanies, json!({"items": [{"id": "CO1", "name": "Main"}]}))
            .with_list(Op::GetProducts, json!({"data": {"products": [
                {"_id": "P1", "name": "Drill", "price": 100, "barcode": "4600001"}
            ]}}))
            .with_list(Op::GetFunnels, funnels_response())
            .with_contracts(contracts_fixture())
    }

    fn drill() -> ProductOption {
        ProductOption {
            id: "P1".to_string(),
            name: "Drill".to_string(),
            serial_number: String::new(),
            barcode: "4600001".to_string(),
            price: 100.0,
            vat: 0.0,
            guarantee: String::new(),
        }
    }

    fn fill_required(store: &TestStore) {
        store.set_form_field(DealField::ClientId, "CL1".to_string());
        store.set_form_field(DealField::CounterpartyId, "CP1".to_string());
        store.set_form_field(DealField::CompanyId, "CO1".to_string());
    }

    #[tokio::test]
    async fn test_reference_data_chains_funnels() {
        let store = store_with(seeded_api());
        store.load_reference_data(false).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.reference.clients[0].name, "Ivan Petrov");
        assert_eq!(state.reference.counterparties.len(), 1);
        assert_eq!(state.reference.companies.len(), 1);
        assert_eq!(state.reference.funnels.len(), 3);
        assert_eq!(state.board.columns.len(), 4);
        assert!(state.reference.references_gate.is_loaded());

        store.load_reference_data(false).await.unwrap();
        assert_eq!(store.api().count(Op::GetClients), 1);
        assert_eq!(store.api().count(Op::GetFunnels), 1);
    }

    #[tokio::test]
    async fn test_load_funnels_twice_fetches_once() {
        let store = store_with(seeded_api());
        store.load_funnels(false).await.unwrap();
        store.load_funnels(false).await.unwrap();
        assert_eq!(store.api().count(Op::GetFunnels), 1);

        store.load_funnels(true).await.unwrap();
        assert_eq!(store.api().count(Op::GetFunnels), 2);
    }

    #[tokio::test]
    async fn test_concurrent_loads_are_single_flight() {
        let store = store_with(seeded_api());
        let (a, b) = tokio::join!(store.load_products(false), store.load_products(true));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(store.api().count(Op::GetProducts), 1);
        assert_eq!(store.snapshot().reference.products.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_data() {
        let store = store_with(seeded_api());
        store.load_reference_data(false).await.unwrap();

        store.api().fail(Op::GetCompanies);
        let result = store.load_reference_data(true).await;
        assert_eq!(result, Err(DealError::Api("GetCompanies failed".to_string())));

        let state = store.snapshot();
        assert_eq!(state.reference.clients.len(), 1);
        assert_eq!(state.reference.companies.len(), 1);
        assert!(!state.reference.references_gate.is_loading());
        assert_eq!(state.error.as_deref(), Some("GetCompanies failed"));
        assert_eq!(state.notices.count(NoticeLevel::Error), 1);
        // one failing cache does not block the others
        store.load_products(false).await.unwrap();
        assert_eq!(store.snapshot().reference.products.len(), 1);
    }

    #[tokio::test]
    async fn test_load_board_denormalizes_names() {
        let store = store_with(seeded_api());
        store.load_board(&CancelFlag::new()).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.board.contracts.len(), 3);
        let c1 = state.board.card("C1").unwrap();
        assert_eq!(c1.client_name.as_deref(), Some("Ivan Petrov"));
        assert_eq!(c1.counterparty_name.as_deref(), Some("Acme"));
        let c2 = state.board.card("C2").unwrap();
        assert_eq!(c2.client_name.as_deref(), Some("Beta"));
        assert_eq!(state.board.column_of(c2), "F2");
        let c3 = state.board.card("C3").unwrap();
        assert_eq!(state.board.column_of(c3), "");
    }

    #[tokio::test]
    async fn test_cancelled_board_load_is_dropped() {
        let store = store_with(seeded_api());
        let cancel = CancelFlag::new();
        cancel.cancel();
        store.load_contracts(&cancel).await.unwrap();

        let state = store.snapshot();
        assert!(state.board.contracts.is_empty());
        assert!(!state.board.contracts_loaded);
        assert!(!state.board.contracts_loading);
    }

    #[tokio::test]
    async fn test_edit_hydrates_form() {
        let store = store_with(seeded_api());
        store.load_contract_for_edit("C1", &CancelFlag::new()).await.unwrap();

        let form = store.snapshot().form;
        assert_eq!(form.mode, FormMode::Edit);
        assert_eq!(form.editing_id.as_deref(), Some("C1"));
        assert_eq!(form.data.client_id, "CL1");
        assert_eq!(form.data.funnel_id, "F1");
        assert_eq!(form.products.len(), 1);
        assert_eq!(form.products[0].id, "P1");
    }

    #[tokio::test]
    async fn test_failed_edit_load_sends_nothing() {
        let store = store_with(seeded_api());
        store.initialize_form(FormMode::Create);
        fill_required(&store);
        store.add_product_to_deal(&drill());

        store.api().fail(Op::GetContractById);
        assert!(store.load_contract_for_edit("C1", &CancelFlag::new()).await.is_err());

        let form = store.snapshot().form;
        assert_eq!(form.mode, FormMode::Edit);
        assert_eq!(form.editing_id, None);
        assert_eq!(form.data.client_id, "");
        assert!(form.products.is_empty());

        // even a complete draft must not turn into a new contract
        fill_required(&store);
        store.add_product_to_deal(&drill());
        let result = store.submit_deal().await;
        assert_eq!(result, Err(DealError::EditTargetMissing));
        assert_eq!(store.api().count(Op::CreateContract), 0);
        assert_eq!(store.api().count(Op::UpdateContract), 0);
        assert_eq!(store.snapshot().notices.count(NoticeLevel::Warning), 1);
    }

    #[tokio::test]
    async fn test_edit_load_cancelled_in_flight_is_dropped() {
        let store = store_with(seeded_api());
        let cancel = CancelFlag::new();

        let (result, _) = tokio::join!(store.load_contract_for_edit("C1", &cancel), async {
            cancel.cancel();
        });
        assert!(result.is_ok());
        assert_eq!(store.api().count(Op::GetContractById), 1);

        let form = store.snapshot().form;
        assert_eq!(form.editing_id, None);
        assert_eq!(form.data.client_id, "");
        assert!(form.products.is_empty());
    }

    #[tokio::test]
    async fn test_create_draft_survives_reference_loads() {
        let store = store_with(seeded_api());
        store.initialize_form(FormMode::Create);

        let (references, products, _) = tokio::join!(
            store.load_reference_data(false),
            store.load_products(false),
            async { store.set_form_field(DealField::ContractNumber, "K-7".to_string()) }
        );
        assert!(references.is_ok() && products.is_ok());

        store.initialize_form(FormMode::Create);
        assert_eq!(store.snapshot().form.data.contract_number, "K-7");
    }

    #[tokio::test]
    async fn test_add_same_product_twice() {
        let store = store_with(MockCrmApi::new());
        let first = store.add_product_to_deal(&drill());
        let second = store.add_product_to_deal(&drill());

        let products = store.snapshot().form.products;
        assert_eq!(products.len(), 2);
        assert_ne!(first, second);
        assert!(products.iter().all(|p| p.id == "P1"));

        store.remove_product_from_deal(&first);
        assert_eq!(store.snapshot().form.products.len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_by_code() {
        let store = store_with(seeded_api());
        store.load_products(false).await.unwrap();

        assert!(store.add_product_by_code(" 4600001 ").is_some());
        assert!(store.add_product_by_code("999").is_none());
        let state = store.snapshot();
        assert_eq!(state.form.products.len(), 1);
        assert_eq!(state.notices.count(NoticeLevel::Warning), 1);
    }

    #[tokio::test]
    async fn test_invalid_deal_sends_nothing() {
        let store = store_with(seeded_api());
        store.initialize_form(FormMode::Create);
        store.set_form_field(DealField::ClientId, "CL1".to_string());
        let before = store.snapshot().form;

        let result = store.submit_deal().await;
        assert!(matches!(result, Err(DealError::Validation(_))));
        assert_eq!(store.api().count(Op::CreateContract), 0);
        assert_eq!(store.snapshot().form, before);
        assert_eq!(store.snapshot().notices.count(NoticeLevel::Warning), 1);
    }

    #[tokio::test]
    async fn test_create_deal() {
        let store = store_with(seeded_api());
        store.initialize_form(FormMode::Create);
        fill_required(&store);
        let uid = store.add_product_to_deal(&drill());
        store.set_product_field(&uid, ProductField::Quantity, "2");
        store.sync_amount_from_products();

        let id = store.submit_deal().await.unwrap();
        assert_eq!(id, "NEW1");

        let calls = store.api().calls_of(Op::CreateContract);
        assert_eq!(calls.len(), 1);
        let body = calls[0].body.clone().unwrap();
        assert_eq!(body["client_id"], "CL1");
        assert_eq!(body["funnel_id"], ZERO_FUNNEL_ID);
        assert_eq!(body["contract_amount"], 200.0);
        assert_eq!(body["products"][0]["quantity"], 2);

        let state = store.snapshot();
        assert!(!state.form.initialized);
        assert!(state.form.products.is_empty());
        assert_eq!(state.notices.count(NoticeLevel::Success), 1);
        // board was never opened, nothing to refresh
        assert_eq!(store.api().count(Op::GetContracts), 0);
    }

    #[tokio::test]
    async fn test_update_deal_refreshes_board() {
        let store = store_with(seeded_api());
        store.load_board(&CancelFlag::new()).await.unwrap();
        store.load_contract_for_edit("C1", &CancelFlag::new()).await.unwrap();
        store.set_form_field(DealField::Comment, "повторный звонок".to_string());

        let id = store.submit_deal().await.unwrap();
        assert_eq!(id, "C1");
        let calls = store.api().calls_of(Op::UpdateContract);
        assert_eq!(calls[0].id.as_deref(), Some("C1"));
        assert_eq!(calls[0].body.as_ref().unwrap()["comment"], "повторный звонок");
        assert_eq!(store.api().count(Op::GetContracts), 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let store = store_with(seeded_api());
        store.initialize_form(FormMode::Create);
        fill_required(&store);
        store.add_product_to_deal(&drill());
        store.api().fail(Op::CreateContract);

        assert!(store.submit_deal().await.is_err());
        let state = store.snapshot();
        assert_eq!(state.form.products.len(), 1);
        assert!(!state.form.submitting);
        assert_eq!(state.notices.count(NoticeLevel::Error), 1);
    }

    #[tokio::test]
    async fn test_delete_contract() {
        let store = store_with(seeded_api());
        store.load_contracts(&CancelFlag::new()).await.unwrap();
        store.delete_contract("C2").await.unwrap();

        let state = store.snapshot();
        assert!(state.board.card("C2").is_none());
        assert_eq!(state.board.contracts.len(), 2);
    }
}
