pub mod a001_reference;
pub mod a004_product;
pub mod a005_funnel;
pub mod a006_contract;
