//! Deal store
//!
//! One [`DealState`] value holds every cache the deal pages share: lookup
//! collections, the deal draft and the Kanban board. [`DealStore`] owns the
//! state cell plus the backend collaborator and exposes every operation as
//! a method; the board operations live in `a005_funnel::board::service`.

pub mod context;
pub mod form;
pub mod reference;
mod service;

pub use context::{provide_deal_store, use_deal_store, AppDealStore};
pub use form::{FormMode, FormState};
pub use reference::{CacheGate, ReferenceState};

use crate::domain::a005_funnel::board::BoardState;
use crate::shared::crm_api::CrmApi;
use crate::shared::state::{NoticeLevel, NoticeQueue, StoreCell};
use contracts::domain::a006_contract::{ValidationError, WriteError};
use std::sync::Arc;
use thiserror::Error;

/// Everything the deal pages render from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealState {
    pub reference: ReferenceState,
    pub form: FormState,
    pub board: BoardState,
    /// Last load failure, shown above the page
    pub error: Option<String>,
    pub notices: NoticeQueue,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DealError {
    #[error("{0}")]
    Api(String),

    #[error("Сделка {contract_id} повреждена: {source}")]
    Integrity {
        contract_id: String,
        #[source]
        source: WriteError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Сделка {0} не найдена")]
    UnknownContract(String),

    #[error("Сделка для редактирования не загружена")]
    EditTargetMissing,

    #[error("Колонка {0} не найдена")]
    UnknownColumn(String),

    #[error("Колонку «Без воронки» нельзя изменить")]
    UnassignedColumn,

    #[error("Воронка «{0}» используется в сделках")]
    FunnelInUse(String),

    #[error("Некорректная воронка: {0}")]
    InvalidFunnel(&'static str),
}

impl From<String> for DealError {
    fn from(message: String) -> Self {
        Self::Api(message)
    }
}

pub struct DealStore<C, A> {
    pub(crate) state: C,
    pub(crate) api: Arc<A>,
}

impl<C: Clone, A> Clone for DealStore<C, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<C, A> DealStore<C, A>
where
    C: StoreCell<DealState>,
    A: CrmApi + 'static,
{
    pub fn new(state: C, api: A) -> Self {
        Self {
            state,
            api: Arc::new(api),
        }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Untracked copy of the whole state
    pub fn snapshot(&self) -> DealState {
        self.state.peek(Clone::clone)
    }

    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        let mut id = 0;
        self.state.mutate(|s| id = s.notices.push(level, message));
        id
    }

    pub fn dismiss_notice(&self, id: u64) {
        self.state.mutate(|s| s.notices.dismiss(id));
    }

    pub fn clear_error(&self) {
        self.state.mutate(|s| s.error = None);
    }
}
