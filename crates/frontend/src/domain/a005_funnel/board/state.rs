use contracts::domain::a005_funnel::aggregate::{is_unassigned, renumber, sort_by_order};
use contracts::domain::a005_funnel::to_backend_funnel_id;
use contracts::domain::a005_funnel::FunnelOption;
use contracts::domain::a006_contract::ContractCard;
use std::collections::HashMap;

/// Transient state of one drag domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState<T> {
    #[default]
    Idle,
    Dragging(T),
    DropPending(T),
}

impl<T> DragState<T> {
    pub fn current(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Dragging(item) | Self::DropPending(item) => Some(item),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDrag {
    pub contract_id: String,
    pub from_column_id: String,
}

/// Outcome of committing a typed column order
#[derive(Debug, Clone, PartialEq)]
pub enum OrderCommit {
    /// Not a number; the input falls back to the committed order
    Invalid { committed: i64 },
    Unchanged,
    /// Full funnel column list, sorted and renumbered
    Reorder(Vec<FunnelOption>),
}

/// Kanban board: columns derived from funnels, cards from contracts
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    /// Always starts with the unassigned column
    pub columns: Vec<FunnelOption>,
    pub contracts: Vec<ContractCard>,
    pub contracts_loaded: bool,
    pub contracts_loading: bool,
    /// Set while a local column order has not been persisted yet
    pub locally_reordered: bool,
    pub column_drag: DragState<String>,
    pub card_drag: DragState<CardDrag>,
    /// Last card move in flight; a later move overwrites it
    pub moving_contract_id: Option<String>,
    /// Raw text of the order inputs being edited
    pub order_drafts: HashMap<String, String>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            columns: vec![FunnelOption::unassigned()],
            contracts: Vec::new(),
            contracts_loaded: false,
            contracts_loading: false,
            locally_reordered: false,
            column_drag: DragState::Idle,
            card_drag: DragState::Idle,
            moving_contract_id: None,
            order_drafts: HashMap::new(),
        }
    }
}

impl BoardState {
    // ========================================================================
    // Columns
    // ========================================================================

    /// Rebuild columns from a fresh funnel list.
    ///
    /// After a local rearrangement the current sequence is kept for funnels
    /// still present and new funnels are appended; otherwise the stored
    /// order wins.
    pub fn sync_columns(&mut self, funnels: &[FunnelOption]) {
        let mut fresh: Vec<FunnelOption> = funnels.iter().filter(|f| !f.is_unassigned()).cloned().collect();

        let ordered = if self.locally_reordered {
            let mut kept: Vec<FunnelOption> = self
                .funnel_columns()
                .filter_map(|column| fresh.iter().find(|f| f.id == column.id).cloned())
                .collect();
            fresh.retain(|f| !kept.iter().any(|k| k.id == f.id));
            sort_by_order(&mut fresh);
            kept.extend(fresh);
            kept
        } else {
            sort_by_order(&mut fresh);
            fresh
        };

        self.set_funnel_columns(ordered);
    }

    /// Columns without the unassigned one
    pub fn funnel_columns(&self) -> impl Iterator<Item = &FunnelOption> {
        self.columns.iter().filter(|c| !c.is_unassigned())
    }

    pub fn set_funnel_columns(&mut self, funnels: Vec<FunnelOption>) {
        let mut columns = Vec::with_capacity(funnels.len() + 1);
        columns.push(FunnelOption::unassigned());
        columns.extend(funnels.into_iter().filter(|f| !f.is_unassigned()));
        self.columns = columns;
    }

    pub fn column(&self, id: &str) -> Option<&FunnelOption> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Funnel-only list with `dragged` moved to `target`'s position and
    /// orders rewritten as `1..N`
    pub fn reordered_columns(&self, dragged: &str, target: &str) -> Option<Vec<FunnelOption>> {
        if dragged == target || is_unassigned(dragged) || is_unassigned(target) {
            return None;
        }
        let mut funnels: Vec<FunnelOption> = self.funnel_columns().cloned().collect();
        let from = funnels.iter().position(|f| f.id == dragged)?;
        let to = funnels.iter().position(|f| f.id == target)?;
        let moved = funnels.remove(from);
        funnels.insert(to, moved);
        renumber(&mut funnels);
        Some(funnels)
    }

    pub fn apply_column_order(&mut self, funnels: Vec<FunnelOption>) {
        self.set_funnel_columns(funnels);
        self.locally_reordered = true;
    }

    // ========================================================================
    // Cards
    // ========================================================================

    /// Column a card renders in; unknown funnels fall into unassigned
    pub fn column_of(&self, card: &ContractCard) -> String {
        let funnel_id = card.funnel_id();
        if self.funnel_columns().any(|c| c.id == funnel_id) {
            funnel_id
        } else {
            String::new()
        }
    }

    pub fn cards_in(&self, column_id: &str) -> Vec<&ContractCard> {
        self.contracts
            .iter()
            .filter(|card| self.column_of(card) == column_id)
            .collect()
    }

    pub fn card(&self, contract_id: &str) -> Option<&ContractCard> {
        self.contracts.iter().find(|c| c.id == contract_id)
    }

    /// Local rewrite of a card's funnel reference to the value the backend
    /// will store; the live column object is attached when there is one
    pub fn move_card(&mut self, contract_id: &str, target_column: &str) -> bool {
        let funnel = self.column(target_column).filter(|c| !c.is_unassigned()).cloned();
        match self.contracts.iter_mut().find(|c| c.id == contract_id) {
            Some(card) => {
                card.funnel_ref = to_backend_funnel_id(target_column);
                card.funnel = funnel;
                true
            }
            None => false,
        }
    }

    pub fn remove_card(&mut self, contract_id: &str) {
        self.contracts.retain(|c| c.id != contract_id);
    }

    // ========================================================================
    // Manual order entry
    // ========================================================================

    /// Text shown in a column's order input
    pub fn display_order(&self, column_id: &str) -> String {
        if let Some(draft) = self.order_drafts.get(column_id) {
            return draft.clone();
        }
        self.column(column_id)
            .map(|c| c.order.to_string())
            .unwrap_or_default()
    }

    pub fn set_order_draft(&mut self, column_id: &str, text: String) {
        self.order_drafts.insert(column_id.to_string(), text);
    }

    pub fn clear_order_draft(&mut self, column_id: &str) {
        self.order_drafts.remove(column_id);
    }

    /// Plan for a typed order. The edited column goes first among equal
    /// orders, so typing `1` really puts it first.
    pub fn order_commit_plan(&self, column_id: &str, typed: &str) -> Option<OrderCommit> {
        let committed = self.column(column_id).filter(|c| !c.is_unassigned())?.order;
        let Ok(requested) = typed.trim().parse::<i64>() else {
            return Some(OrderCommit::Invalid { committed });
        };
        if requested == committed {
            return Some(OrderCommit::Unchanged);
        }

        let mut funnels: Vec<FunnelOption> = self.funnel_columns().cloned().collect();
        for funnel in funnels.iter_mut().filter(|f| f.id == column_id) {
            funnel.order = requested;
        }
        funnels.sort_by_key(|f| (f.order, f.id != column_id));
        renumber(&mut funnels);
        Some(OrderCommit::Reorder(funnels))
    }
}
