//! Kanban board of deals grouped by funnel

pub mod intent;
mod service;
pub mod state;

pub use intent::{resolve_drop, BoardIntent, DragPayload, DropZone, DRAG_MIME};
pub use state::{BoardState, CardDrag, DragState, OrderCommit};
