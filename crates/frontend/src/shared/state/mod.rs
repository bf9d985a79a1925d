pub mod cancel;
pub mod notice;
pub mod optimistic;
pub mod store_cell;

pub use cancel::CancelFlag;
pub use notice::{Notice, NoticeLevel, NoticeQueue};
pub use optimistic::{execute, OptimisticCommand};
pub use store_cell::StoreCell;
