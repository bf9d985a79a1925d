pub mod a005_funnel;
pub mod a006_contract;
