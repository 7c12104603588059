pub mod commands;
pub mod log;
pub mod model;

pub use log::BidLog;
pub use model::{BidLogEntry, PlaceBidCommand};
