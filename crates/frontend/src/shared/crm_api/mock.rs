//! In-memory `CrmApi` for store tests

use super::{ApiResult, CrmApi};
use crate::shared::api_utils::ListParams;
use async_trait::async_trait;
use contracts::domain::a005_funnel::{normalize_funnel_id, FunnelDto};
use contracts::domain::a006_contract::ContractWriteDto;
use contracts::shared::field_table::first_ref;
use contracts::shared::record_id::has_id;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetClients,
    GetCounterparties,
    GetCompanies,
    GetProducts,
    GetFunnels,
    GetContracts,
    GetContractById,
    CreateContract,
    UpdateContract,
    DeleteContract,
    CreateFunnel,
    UpdateFunnel,
    DeleteFunnel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: Op,
    pub id: Option<String>,
    pub body: Option<Value>,
    pub params: Option<ListParams>,
}

#[derive(Default)]
pub struct MockCrmApi {
    pub lists: RefCell<HashMap<Op, Value>>,
    pub contracts: RefCell<Vec<Value>>,
    pub failing: RefCell<HashSet<Op>>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockCrmApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, op: Op, response: Value) -> Self {
        self.lists.borrow_mut().insert(op, response);
        self
    }

    pub fn with_contracts(self, contracts: Vec<Value>) -> Self {
        *self.contracts.borrow_mut() = contracts;
        self
    }

    pub fn fail(&self, op: Op) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.failing.borrow_mut().remove(&op);
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.borrow().iter().filter(|c| c.op == op).count()
    }

    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    // Every call yields once so concurrent store operations interleave
    async fn record(&self, op: Op, id: Option<&str>, body: Option<Value>, params: Option<&ListParams>) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call {
            op,
            id: id.map(str::to_string),
            body,
            params: params.cloned(),
        });
        tokio::task::yield_now().await;
        if self.failing.borrow().contains(&op) {
            return Err(format!("{:?} failed", op));
        }
        Ok(())
    }

    async fn list(&self, op: Op, params: &ListParams) -> ApiResult<Value> {
        self.record(op, None, None, Some(params)).await?;
        Ok(self.lists.borrow().get(&op).cloned().unwrap_or_else(|| json!([])))
    }
}

#[async_trait(?Send)]
impl CrmApi for MockCrmApi {
    async fn get_clients(&self, params: &ListParams) -> ApiResult<Value> {
        self.list(Op::GetClients, params).await
    }

    async fn get_counterparties(&self, params: &ListParams) -> ApiResult<Value> {
        self.list(Op::GetCounterparties, params).await
    }

    async fn get_companies(&self, params: &ListParams) -> ApiResult<Value> {
        self.list(Op::GetCompanies, params).await
    }

    async fn get_products(&self, params: &ListParams) -> ApiResult<Value> {
        self.list(Op::GetProducts, params).await
    }

    async fn get_funnels(&self, params: &ListParams) -> ApiResult<Value> {
        self.list(Op::GetFunnels, params).await
    }

    async fn get_contracts(&self, params: &ListParams) -> ApiResult<Value> {
        self.record(Op::GetContracts, None, None, Some(params)).await?;
        let contracts = self.contracts.borrow();
        let mut matching: Vec<Value> = contracts
            .iter()
            .filter(|raw| match &params.funnel_id {
                Some(funnel) => {
                    normalize_funnel_id(first_ref(raw, &["funnel_id", "funnelId", "funnel"]).as_deref())
                        == normalize_funnel_id(Some(funnel))
                }
                None => true,
            })
            .cloned()
            .collect();
        if let Some(limit) = params.limit {
            matching.truncate(limit as usize);
        }
        Ok(json!({ "data": { "contracts": matching, "total": contracts.len() } }))
    }

    async fn get_contract_by_id(&self, id: &str) -> ApiResult<Value> {
        self.record(Op::GetContractById, Some(id), None, None).await?;
        self.contracts
            .borrow()
            .iter()
            .find(|raw| has_id(raw, id))
            .map(|raw| json!({ "data": raw }))
            .ok_or_else(|| "Not found".to_string())
    }

    async fn create_contract(&self, payload: &ContractWriteDto) -> ApiResult<Value> {
        let body = serde_json::to_value(payload).map_err(|e| e.to_string())?;
        self.record(Op::CreateContract, None, Some(body), None).await?;
        Ok(json!({ "data": { "_id": "NEW1" } }))
    }

    async fn update_contract(&self, id: &str, payload: &ContractWriteDto) -> ApiResult<Value> {
        let body = serde_json::to_value(payload).map_err(|e| e.to_string())?;
        self.record(Op::UpdateContract, Some(id), Some(body.clone()), None).await?;
        Ok(body)
    }

    async fn delete_contract(&self, id: &str) -> ApiResult<()> {
        self.record(Op::DeleteContract, Some(id), None, None).await?;
        self.contracts.borrow_mut().retain(|raw| !has_id(raw, id));
        Ok(())
    }

    async fn create_funnel(&self, payload: &FunnelDto) -> ApiResult<Value> {
        let body = serde_json::to_value(payload).map_err(|e| e.to_string())?;
        self.record(Op::CreateFunnel, None, Some(body), None).await?;
        Ok(json!({ "id": "F-NEW" }))
    }

    async fn update_funnel(&self, id: &str, payload: &FunnelDto) -> ApiResult<Value> {
        let body = serde_json::to_value(payload).map_err(|e| e.to_string())?;
        self.record(Op::UpdateFunnel, Some(id), Some(body.clone()), None).await?;
        Ok(body)
    }

    async fn delete_funnel(&self, id: &str) -> ApiResult<()> {
        self.record(Op::DeleteFunnel, Some(id), None, None).await
    }
}

/// Records shaped the way the backend answers, with mixed field conventions
pub fn funnels_response() -> Value {
    json!({
        "data": [
            {"_id": "F1", "name": "Новые", "color": "#22c55e", "order": 1},
            {"_id": "F2", "name": "Переговоры", "color": "#3b82f6", "order": 2},
            {"id": "F3", "title": "Оплата", "colour": "#f59e0b", "sort_order": 3}
        ]
    })
}

pub fn contracts_fixture() -> Vec<Value> {
    vec![
        json!({
            "_id": "C1",
            "client_id": "CL1",
            "counterparty_id": "CP1",
            "company_id": "CO1",
            "funnel_id": "F1",
            "contract_number": "1",
            "contract_amount": 100,
            "products": [{"product_id": "P1", "price": 100, "quantity": 1, "vat": 0, "discount": 0}]
        }),
        json!({
            "_id": "C2",
            "client": {"_id": "CL2", "name": "Beta"},
            "counterpartyId": "CP1",
            "companyId": "CO1",
            "funnel": {"_id": "F2", "name": "Переговоры"},
            "contract_number": "2"
        }),
        json!({
            "_id": "C3",
            "client_id": "CL1",
            "counterparty_id": "CP1",
            "funnel_id": "000000000000000000000000",
            "contract_number": "3"
        }),
    ]
}
