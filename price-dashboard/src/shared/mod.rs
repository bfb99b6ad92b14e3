/// Shared modules for the price dashboard
pub mod calc;
pub mod charts;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod keys;
pub mod map;
pub mod runtime;
pub mod simulator;
pub mod state;
pub mod table;
pub mod types;
pub mod widgets;
