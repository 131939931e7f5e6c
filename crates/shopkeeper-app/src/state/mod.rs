//! # Application State
//!
//! Focused state types rather than one god object: each service function
//! takes only the state it needs.

mod cart;
mod config;

pub use cart::{CartState, CartTotals};
pub use config::{AppConfig, ConfigError};
