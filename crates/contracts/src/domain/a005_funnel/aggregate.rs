use crate::shared::field_table::{first_number, first_text, FieldTable};
use crate::shared::record_id::resolve_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Sentinels
// ============================================================================

/// Backend value meaning "no funnel assigned" (an all-zero object id)
pub const ZERO_FUNNEL_ID: &str = "000000000000000000000000";

/// Canonical in-app value for "no funnel"; also the id of the synthetic column
pub const UNASSIGNED_COLUMN_ID: &str = "";

pub const UNASSIGNED_COLUMN_NAME: &str = "Без воронки";
pub const UNASSIGNED_COLUMN_COLOR: &str = "#9ca3af";
pub const DEFAULT_FUNNEL_COLOR: &str = "#6b7280";

/// Map every "no funnel" representation to [`UNASSIGNED_COLUMN_ID`].
///
/// `None`, `"null"`, `"undefined"` and [`ZERO_FUNNEL_ID`] collapse to `""`;
/// any other non-empty id is returned unchanged.
pub fn normalize_funnel_id(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") | Some("null") | Some("undefined") => UNASSIGNED_COLUMN_ID.to_string(),
        Some(id) if id == ZERO_FUNNEL_ID => UNASSIGNED_COLUMN_ID.to_string(),
        Some(id) => id.to_string(),
    }
}

/// Reverse direction: the value written to the backend
pub fn to_backend_funnel_id(funnel_id: &str) -> String {
    let normalized = normalize_funnel_id(Some(funnel_id));
    if normalized.is_empty() {
        ZERO_FUNNEL_ID.to_string()
    } else {
        normalized
    }
}

pub fn is_unassigned(funnel_id: &str) -> bool {
    normalize_funnel_id(Some(funnel_id)).is_empty()
}

// ============================================================================
// View model
// ============================================================================

const NAME: FieldTable = &["name", "title", "funnel_name", "funnelName"];
const COLOR: FieldTable = &["color", "colour", "hex"];
const COMMENT: FieldTable = &["comment", "description"];
const ORDER: FieldTable = &["order", "sort_order", "sortOrder", "position", "sort"];

/// Pipeline stage shown as one Kanban column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelOption {
    pub id: String,
    pub name: String,
    pub color: String,
    pub comment: Option<String>,
    pub order: i64,
}

impl FunnelOption {
    /// Synthetic column for contracts without a funnel; never persisted
    pub fn unassigned() -> Self {
        Self {
            id: UNASSIGNED_COLUMN_ID.to_string(),
            name: UNASSIGNED_COLUMN_NAME.to_string(),
            color: UNASSIGNED_COLUMN_COLOR.to_string(),
            comment: None,
            order: 0,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == UNASSIGNED_COLUMN_ID
    }

    /// Records without an id, and the zero sentinel itself, are skipped
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let id = normalize_funnel_id(resolve_id(raw).as_deref());
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id,
            name: first_text(raw, NAME).unwrap_or_else(|| "Воронка".to_string()),
            color: first_text(raw, COLOR).unwrap_or_else(|| DEFAULT_FUNNEL_COLOR.to_string()),
            comment: first_text(raw, COMMENT),
            order: first_number(raw, ORDER).map(|n| n.round() as i64).unwrap_or(0),
        })
    }

    pub fn to_dto(&self) -> FunnelDto {
        FunnelDto {
            name: self.name.clone(),
            color: self.color.clone(),
            comment: self.comment.clone(),
            order: self.order,
        }
    }
}

/// Sort by `order`; equal orders keep their incoming position
pub fn sort_by_order(funnels: &mut [FunnelOption]) {
    funnels.sort_by_key(|f| f.order);
}

/// Rewrite orders as `1..=N` following the current sequence
pub fn renumber(funnels: &mut [FunnelOption]) {
    for (index, funnel) in funnels.iter_mut().enumerate() {
        funnel.order = index as i64 + 1;
    }
}

// ============================================================================
// Write payload
// ============================================================================

/// Create/update payload for a funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelDto {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub order: i64,
}

impl FunnelDto {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Название воронки обязательно");
        }
        Ok(())
    }
}
