//! Scratch node: hosts one settlement module over an in-memory ledger and
//! exposes it over HTTP.

pub mod api;
pub mod commands;
pub mod config;
pub mod logging;
pub mod node;
pub mod state;

pub use config::ScratchConfig;
pub use node::{EventObserver, LogObserver, ScratchNode};
