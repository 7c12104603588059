pub mod auction;
pub mod bidding;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod input;
pub mod loader;
pub mod roster;
pub mod scheduler;
