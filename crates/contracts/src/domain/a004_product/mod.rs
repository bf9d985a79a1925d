pub mod aggregate;

pub use aggregate::ProductOption;
