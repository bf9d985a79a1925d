//! Drag-and-drop payloads and their resolution into board intents
//!
//! The DOM only carries a JSON [`DragPayload`] in `dataTransfer`; the drop
//! handler pairs it with the [`DropZone`] it landed on and
//! [`resolve_drop`] decides what, if anything, the board should do.

use contracts::domain::a005_funnel::aggregate::is_unassigned;
use serde::{Deserialize, Serialize};

/// MIME type used for `dataTransfer`
pub const DRAG_MIME: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    Column {
        column_id: String,
    },
    Card {
        contract_id: String,
        from_column_id: String,
    },
}

impl DragPayload {
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Foreign drags (files, text from other pages) decode to `None`
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropZone {
    ColumnHeader(String),
    ColumnBody(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    ReorderColumns {
        dragged: String,
        target: String,
    },
    MoveCard {
        contract_id: String,
        from: String,
        to: String,
    },
}

/// Columns drop on headers, cards drop on bodies. The unassigned column
/// never takes part in a reorder and dropping onto the origin is a no-op.
pub fn resolve_drop(payload: &DragPayload, zone: &DropZone) -> Option<BoardIntent> {
    match (payload, zone) {
        (DragPayload::Column { column_id }, DropZone::ColumnHeader(target)) => {
            if column_id == target || is_unassigned(column_id) || is_unassigned(target) {
                return None;
            }
            Some(BoardIntent::ReorderColumns {
                dragged: column_id.clone(),
                target: target.clone(),
            })
        }
        (
            DragPayload::Card {
                contract_id,
                from_column_id,
            },
            DropZone::ColumnBody(target),
        ) => {
            if from_column_id == target {
                return None;
            }
            Some(BoardIntent::MoveCard {
                contract_id: contract_id.clone(),
                from: from_column_id.clone(),
                to: target.clone(),
            })
        }
        _ => None,
    }
}
