pub mod details;

pub use details::{DealCreatePage, DealEditPage};
