//! # Repository Layer
//!
//! One repository per aggregate. Each holds a clone of the shared pool and
//! exposes async CRUD; only [`OrderRepository::create`] opens an explicit
//! transaction.

mod client;
mod order;
mod product;
mod settings;

pub use client::ClientRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use settings::SettingsRepository;
