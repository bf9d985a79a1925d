pub mod aggregate;
pub mod line_item;
pub mod write;

pub use aggregate::{hydrate_from_contract, ContractCard, DealField, DealFormData};
pub use line_item::{deal_total, DealProduct, ProductField};
pub use write::{ContractProductDto, ContractWriteDto, ValidationError, WriteError};
