pub mod board;
pub mod ui;
