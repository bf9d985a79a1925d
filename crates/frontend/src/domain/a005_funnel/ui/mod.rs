pub mod board;

pub use board::FunnelBoard;
