pub mod aggregate;

pub use aggregate::{
    normalize_funnel_id, to_backend_funnel_id, FunnelDto, FunnelOption, UNASSIGNED_COLUMN_ID,
    ZERO_FUNNEL_ID,
};
