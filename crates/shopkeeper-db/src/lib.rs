//! # shopkeeper-db: Database Layer for Shopkeeper
//!
//! SQLite storage for the shop: catalogue, clients, captured orders and the
//! configuration documents.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     shopkeeper-db Structure                             │
//! │                                                                         │
//! │  ┌──────────────┐     ┌──────────────────────────────────────────────┐ │
//! │  │   Database   │────▶│              Repositories                    │ │
//! │  │  (pool.rs)   │     │                                              │ │
//! │  │              │     │  ProductRepository   catalogue CRUD          │ │
//! │  │  WAL mode    │     │  ClientRepository    registry CRUD           │ │
//! │  │  FKs ON      │     │  OrderRepository     submission transaction  │ │
//! │  │  migrations  │     │  SettingsRepository  JSON documents          │ │
//! │  └──────────────┘     └──────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  migrations/ (embedded at compile time)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Decisions
//! - Orders are written in ONE transaction: stock check, ticket numbering,
//!   header, lines and the conditional stock decrement commit together or
//!   not at all.
//! - Client/product attributes are snapshotted onto orders; history never
//!   changes when source rows do.
//! - Settings are whole JSON documents under fixed keys with typed defaults.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{ClientRepository, OrderRepository, ProductRepository, SettingsRepository};
