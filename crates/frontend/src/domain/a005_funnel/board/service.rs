use super::intent::{resolve_drop, BoardIntent, DragPayload, DropZone};
use super::state::{CardDrag, DragState, OrderCommit};
use crate::domain::a006_contract::store::{DealError, DealState, DealStore};
use crate::shared::api_utils::ListParams;
use crate::shared::crm_api::CrmApi;
use crate::shared::state::{execute, NoticeLevel, OptimisticCommand, StoreCell};
use contracts::domain::a005_funnel::aggregate::{is_unassigned, sort_by_order};
use contracts::domain::a005_funnel::{FunnelDto, FunnelOption};
use contracts::domain::a006_contract::aggregate::ENVELOPE_KEYS as CONTRACT_KEYS;
use contracts::domain::a006_contract::{ContractCard, ContractWriteDto};
use contracts::shared::envelope::{extract_array, extract_record};
use contracts::shared::record_id::resolve_id;
use futures_util::future::try_join_all;

/// Column order plus the flag it travels with
type ColumnSnapshot = (Vec<FunnelOption>, bool);

impl<C, A> DealStore<C, A>
where
    C: StoreCell<DealState>,
    A: CrmApi + 'static,
{
    // ========================================================================
    // Drag start / end
    // ========================================================================

    /// Payload for a header drag; the unassigned column is not draggable
    pub fn begin_column_drag(&self, column_id: &str) -> Option<String> {
        if is_unassigned(column_id) {
            return None;
        }
        self.state
            .mutate(|s| s.board.column_drag = DragState::Dragging(column_id.to_string()));
        Some(
            DragPayload::Column {
                column_id: column_id.to_string(),
            }
            .encode(),
        )
    }

    pub fn begin_card_drag(&self, contract_id: &str) -> Option<String> {
        let from_column_id = self.state.peek(|s| {
            s.board
                .card(contract_id)
                .map(|card| s.board.column_of(card))
        })?;
        let drag = CardDrag {
            contract_id: contract_id.to_string(),
            from_column_id: from_column_id.clone(),
        };
        self.state
            .mutate(|s| s.board.card_drag = DragState::Dragging(drag));
        Some(
            DragPayload::Card {
                contract_id: contract_id.to_string(),
                from_column_id,
            }
            .encode(),
        )
    }

    /// Drag cancelled or dropped outside any target
    pub fn end_drag(&self) {
        self.state.mutate(|s| {
            if matches!(s.board.column_drag, DragState::Dragging(_)) {
                s.board.column_drag = DragState::Idle;
            }
            if matches!(s.board.card_drag, DragState::Dragging(_)) {
                s.board.card_drag = DragState::Idle;
            }
        });
    }

    /// Entry point for every drop; foreign or mismatched payloads are ignored
    pub async fn drop_payload(&self, raw: &str, zone: DropZone) -> Result<(), DealError> {
        let intent = DragPayload::decode(raw).and_then(|payload| resolve_drop(&payload, &zone));
        match intent {
            Some(BoardIntent::ReorderColumns { dragged, target }) => self.reorder_columns(&dragged, &target).await,
            Some(BoardIntent::MoveCard { contract_id, to, .. }) => self.move_card(&contract_id, &to).await,
            None => {
                self.end_drag();
                Ok(())
            }
        }
    }

    // ========================================================================
    // Column order
    // ========================================================================

    /// Drop `dragged` onto `target`: reorder locally, then persist
    pub async fn reorder_columns(&self, dragged: &str, target: &str) -> Result<(), DealError> {
        let Some(plan) = self.state.peek(|s| s.board.reordered_columns(dragged, target)) else {
            self.state.mutate(|s| s.board.column_drag = DragState::Idle);
            return Ok(());
        };
        self.state
            .mutate(|s| s.board.column_drag = DragState::DropPending(dragged.to_string()));

        let result = self.persist_columns(plan).await;
        self.state.mutate(|s| s.board.column_drag = DragState::Idle);
        if let Err(e) = &result {
            log::error!("column reorder rolled back: {}", e);
        }
        result
    }

    /// Apply `plan` now, write every funnel order in parallel, roll back
    /// the whole column list if any write fails
    async fn persist_columns(&self, plan: Vec<FunnelOption>) -> Result<(), DealError> {
        let applied = plan.clone();
        let command = self.state.peek(|s| {
            OptimisticCommand::with_snapshot(
                s,
                |s: &DealState| -> ColumnSnapshot { (s.board.columns.clone(), s.board.locally_reordered) },
                |s: &mut DealState, (columns, flag)| {
                    s.board.columns = columns;
                    s.board.locally_reordered = flag;
                },
                move |s: &mut DealState| s.board.apply_column_order(applied),
            )
        });

        let api = &self.api;
        let payloads: Vec<(String, FunnelDto)> = plan.iter().map(|f| (f.id.clone(), f.to_dto())).collect();
        let writes = payloads.iter().map(|(id, dto)| api.update_funnel(id, dto));
        execute(&self.state, command, async move {
            try_join_all(writes).await.map_err(DealError::Api)
        })
        .await?;

        // stored order now matches the screen
        self.state.mutate(|s| {
            let mut funnels = plan;
            sort_by_order(&mut funnels);
            s.reference.funnels = funnels;
            s.board.locally_reordered = false;
        });
        log::info!("column order saved");
        Ok(())
    }

    pub fn set_order_draft(&self, column_id: &str, text: String) {
        self.state.mutate(|s| s.board.set_order_draft(column_id, text));
    }

    /// Blur of a column's order input
    pub async fn commit_column_order(&self, column_id: &str) -> Result<(), DealError> {
        let plan = self.state.peek(|s| {
            let typed = s.board.display_order(column_id);
            s.board.order_commit_plan(column_id, &typed)
        });
        self.state.mutate(|s| s.board.clear_order_draft(column_id));

        match plan {
            None if is_unassigned(column_id) => Err(DealError::UnassignedColumn),
            None => Err(DealError::UnknownColumn(column_id.to_string())),
            Some(OrderCommit::Unchanged) => Ok(()),
            Some(OrderCommit::Invalid { committed }) => {
                log::warn!("order of {} is not a number, kept {}", column_id, committed);
                self.notify(NoticeLevel::Warning, "Порядок должен быть целым числом");
                Ok(())
            }
            Some(OrderCommit::Reorder(funnels)) => {
                let result = self.persist_columns(funnels).await;
                if let Err(e) = &result {
                    log::error!("column order rolled back: {}", e);
                    self.notify(
                        NoticeLevel::Error,
                        format!("Не удалось сохранить порядок воронок: {}", e),
                    );
                }
                result
            }
        }
    }

    // ========================================================================
    // Card moves
    // ========================================================================

    /// Move a card to another column; the contracts list is restored as a
    /// whole when the reassignment fails
    pub async fn move_card(&self, contract_id: &str, to_column: &str) -> Result<(), DealError> {
        let Some(from_column) = self.state.peek(|s| {
            s.board
                .card(contract_id)
                .map(|card| s.board.column_of(card))
        }) else {
            self.state.mutate(|s| s.board.card_drag = DragState::Idle);
            return Err(DealError::UnknownContract(contract_id.to_string()));
        };
        if from_column == to_column {
            self.state.mutate(|s| s.board.card_drag = DragState::Idle);
            return Ok(());
        }

        let target = to_column.to_string();
        let moved = contract_id.to_string();
        let command = self.state.peek(|s| {
            OptimisticCommand::with_snapshot(
                s,
                |s: &DealState| s.board.contracts.clone(),
                |s: &mut DealState, contracts: Vec<ContractCard>| s.board.contracts = contracts,
                move |s: &mut DealState| {
                    s.board.move_card(&moved, &target);
                },
            )
        });
        self.state.mutate(|s| {
            s.board.moving_contract_id = Some(contract_id.to_string());
            s.board.card_drag = DragState::DropPending(CardDrag {
                contract_id: contract_id.to_string(),
                from_column_id: from_column.clone(),
            });
        });

        let result = execute(&self.state, command, self.reassign_funnel(contract_id, to_column)).await;

        self.state.mutate(|s| {
            // a later move owns the flag now
            if s.board.moving_contract_id.as_deref() == Some(contract_id) {
                s.board.moving_contract_id = None;
            }
            if matches!(&s.board.card_drag, DragState::DropPending(d) if d.contract_id == contract_id) {
                s.board.card_drag = DragState::Idle;
            }
        });

        match &result {
            Ok(()) => log::info!("contract {} moved to '{}'", contract_id, to_column),
            Err(e @ DealError::Integrity { .. }) => {
                log::error!("{}", e);
                self.notify(NoticeLevel::Error, e.to_string());
            }
            Err(e) => log::error!("card move rolled back: {}", e),
        }
        result
    }

    /// The update endpoint wants the full contract, so the stored record is
    /// fetched and written back with the new funnel
    async fn reassign_funnel(&self, contract_id: &str, to_column: &str) -> Result<(), DealError> {
        let response = self.api.get_contract_by_id(contract_id).await?;
        let raw = extract_record(&response, CONTRACT_KEYS);
        let payload = ContractWriteDto::for_reassignment(&raw, to_column).map_err(|source| DealError::Integrity {
            contract_id: contract_id.to_string(),
            source,
        })?;
        self.api.update_contract(contract_id, &payload).await?;
        Ok(())
    }

    // ========================================================================
    // Funnel CRUD
    // ========================================================================

    /// Whether any contract still points at the funnel
    pub async fn is_funnel_in_use(&self, funnel_id: &str) -> Result<bool, DealError> {
        let params = ListParams {
            limit: Some(1),
            ..ListParams::default()
        }
        .with_funnel(funnel_id);
        let response = self.api.get_contracts(&params).await?;
        Ok(!extract_array(&response, CONTRACT_KEYS).is_empty())
    }

    /// Create a funnel; without an explicit order it goes last
    pub async fn create_funnel(&self, mut payload: FunnelDto) -> Result<Option<String>, DealError> {
        self.check_funnel(&payload)?;
        if payload.order <= 0 {
            payload.order = self.state.peek(|s| s.board.funnel_columns().map(|f| f.order).max().unwrap_or(0)) + 1;
        }

        let response = match self.api.create_funnel(&payload).await {
            Ok(response) => response,
            Err(e) => return Err(self.report_funnel_failure("создать", e)),
        };
        let id = resolve_id(&extract_record(&response, &["funnel"]));
        self.notify(NoticeLevel::Success, format!("Воронка «{}» создана", payload.name));
        self.load_funnels(true).await?;
        Ok(id)
    }

    pub async fn update_funnel(&self, funnel_id: &str, payload: FunnelDto) -> Result<(), DealError> {
        if is_unassigned(funnel_id) {
            return Err(DealError::UnassignedColumn);
        }
        self.check_funnel(&payload)?;

        if let Err(e) = self.api.update_funnel(funnel_id, &payload).await {
            return Err(self.report_funnel_failure("сохранить", e));
        }
        self.notify(NoticeLevel::Success, "Воронка сохранена");
        self.load_funnels(true).await
    }

    /// Refused with a warning while contracts still use the funnel
    pub async fn delete_funnel(&self, funnel_id: &str) -> Result<(), DealError> {
        if is_unassigned(funnel_id) {
            return Err(DealError::UnassignedColumn);
        }

        let in_use = match self.is_funnel_in_use(funnel_id).await {
            Ok(in_use) => in_use,
            Err(e) => return Err(self.report_funnel_failure("проверить", e.to_string())),
        };
        if in_use {
            let name = self.state.peek(|s| {
                s.board
                    .column(funnel_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| funnel_id.to_string())
            });
            let error = DealError::FunnelInUse(name);
            log::warn!("{}", error);
            self.notify(
                NoticeLevel::Warning,
                format!("{}. Перенесите сделки перед удалением", error),
            );
            return Err(error);
        }

        if let Err(e) = self.api.delete_funnel(funnel_id).await {
            return Err(self.report_funnel_failure("удалить", e));
        }
        self.notify(NoticeLevel::Success, "Воронка удалена");
        self.load_funnels(true).await
    }

    fn check_funnel(&self, payload: &FunnelDto) -> Result<(), DealError> {
        payload.validate().map_err(|message| {
            self.notify(NoticeLevel::Warning, message);
            DealError::InvalidFunnel(message)
        })
    }

    fn report_funnel_failure(&self, action: &str, message: String) -> DealError {
        log::error!("funnel {} failed: {}", action, message);
        self.notify(
            NoticeLevel::Error,
            format!("Не удалось {} воронку: {}", action, message),
        );
        DealError::Api(message)
    }
}
