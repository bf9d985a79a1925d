//! Backend collaborator used by the deal store
//!
//! Every call answers with the raw JSON the backend produced; envelope and
//! field-name drift is handled by the adapters in `contracts`, never here.

mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpCrmApi;

use crate::shared::api_utils::ListParams;
use async_trait::async_trait;
use contracts::domain::a001_reference::ReferenceKind;
use contracts::domain::a005_funnel::FunnelDto;
use contracts::domain::a006_contract::ContractWriteDto;
use serde_json::Value;

pub type ApiResult<T> = Result<T, String>;

#[async_trait(?Send)]
pub trait CrmApi {
    async fn get_clients(&self, params: &ListParams) -> ApiResult<Value>;
    async fn get_counterparties(&self, params: &ListParams) -> ApiResult<Value>;
    async fn get_companies(&self, params: &ListParams) -> ApiResult<Value>;
    async fn get_products(&self, params: &ListParams) -> ApiResult<Value>;
    async fn get_funnels(&self, params: &ListParams) -> ApiResult<Value>;

    async fn get_contracts(&self, params: &ListParams) -> ApiResult<Value>;
    async fn get_contract_by_id(&self, id: &str) -> ApiResult<Value>;
    async fn create_contract(&self, payload: &ContractWriteDto) -> ApiResult<Value>;
    async fn update_contract(&self, id: &str, payload: &ContractWriteDto) -> ApiResult<Value>;
    async fn delete_contract(&self, id: &str) -> ApiResult<()>;

    async fn create_funnel(&self, payload: &FunnelDto) -> ApiResult<Value>;
    async fn update_funnel(&self, id: &str, payload: &FunnelDto) -> ApiResult<Value>;
    async fn delete_funnel(&self, id: &str) -> ApiResult<()>;

    /// Dispatch for the three named-option collections
    async fn get_references(&self, kind: ReferenceKind, params: &ListParams) -> ApiResult<Value> {
        match kind {
            ReferenceKind::Client => self.get_clients(params).await,
            ReferenceKind::Counterparty => self.get_counterparties(params).await,
            ReferenceKind::Company => self.get_companies(params).await,
        }
    }
}
