pub mod envelope;
pub mod field_table;
pub mod record_id;
